use std::{
    io::Write,
    time::Duration,
};

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn success(msg: impl std::fmt::Display) -> String {
    format!("{} {}", style("✓").green().bold(), msg)
}

pub fn failure(msg: impl std::fmt::Display) -> String {
    format!("{} {}", style("✗").red().bold(), msg)
}

pub fn rule() {
    println!("{}", style("─".repeat(60)).dim());
}

/// Line-oriented reader over stdin
pub struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `label` and wait for a line. `None` on end of input.
    pub async fn ask(&mut self, label: &str) -> Result<Option<String>> {
        print!("{} ", style(label).cyan().bold());
        std::io::stdout().flush()?;
        Ok(self.lines.next_line().await?.map(|line| line.trim().to_string()))
    }
}
