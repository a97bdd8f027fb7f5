use std::{path::PathBuf, time::Instant};

use anyhow::Result;
use clap::Args;
use console::style;
use romagnosi_core::{
    GeminiClient, default_output_dir, format_duration, generate_speech, speech_path,
};

use crate::ui::{create_spinner, success};

#[derive(Args)]
pub struct SpeakArgs {
    /// Text to read aloud
    text: String,

    /// Output WAV file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: SpeakArgs, client: GeminiClient) -> Result<()> {
    let output = args
        .output
        .unwrap_or_else(|| speech_path(&default_output_dir()));
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let start = Instant::now();
    let spinner = create_spinner("Generating speech...");
    let clip = match generate_speech(&client, &args.text).await {
        Ok(clip) => clip,
        Err(e) => {
            spinner.abandon();
            return Err(e.into());
        }
    };
    clip.save_wav(&output).await?;

    spinner.finish_with_message(success(format!(
        "Speech ready: {} of audio {}",
        format_duration(clip.duration()),
        style(format!("[{}]", format_duration(start.elapsed()))).dim()
    )));
    println!(
        "\n{} {}\n",
        style("Saved:").dim(),
        style(output.display()).cyan()
    );
    Ok(())
}
