use std::time::Duration;

use crate::{
    quiz::{Category, QuizResult, ScoreState},
    video::JobProgress,
};

/// Format a duration as `4.2s` under a minute, `3m 12s` above
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{}m {}s", d.as_secs() / 60, d.as_secs() % 60)
    }
}

/// Human-readable byte count
pub fn format_bytes(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let n = bytes as f64;
    if n >= MB {
        format!("{:.1} MB", n / MB)
    } else if n >= KB {
        format!("{:.1} KB", n / KB)
    } else {
        format!("{} B", bytes)
    }
}

pub fn format_score_table(scores: &ScoreState) -> String {
    let width = Category::ALL
        .iter()
        .map(|c| c.name().len())
        .max()
        .unwrap_or(0);

    scores
        .iter()
        .map(|(category, score)| {
            format!(
                "{:<width$}  {:>3}  {}",
                category.name(),
                score,
                "#".repeat(score as usize),
                width = width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_quiz_result(result: &QuizResult) -> String {
    let mut output = String::new();
    output.push_str(&format!("Recommended path: {}\n\n", result.label()));
    output.push_str(&format_score_table(&result.scores));
    output.push('\n');
    output
}

/// One-line status for a spinner message
pub fn format_progress(progress: &JobProgress) -> String {
    match progress {
        JobProgress::Submitted { operation } => format!("Job submitted ({})", operation),
        JobProgress::Pending { attempt, elapsed } => format!(
            "Rendering video... poll #{} ({})",
            attempt,
            format_duration(*elapsed)
        ),
        JobProgress::Retrying { attempt, reason } => {
            format!("Retrying ({}): {}", attempt, reason)
        }
        JobProgress::Downloading { .. } => "Downloading video...".to_string(),
        JobProgress::Completed { bytes } => format!("Video ready ({})", format_bytes(*bytes)),
        JobProgress::Failed { cause } => format!("Generation failed: {}", cause),
        JobProgress::TimedOut { elapsed } => {
            format!("Gave up after {}", format_duration(*elapsed))
        }
    }
}
