use std::{path::PathBuf, time::{Duration, Instant}};

use anyhow::{Result, bail};
use clap::{Args, ValueEnum};
use console::style;
use romagnosi_core::{
    AspectRatio, GenerationJob, GenerationRequest, ImageInput, PollPolicy, Resolution,
    VideoClient, default_output_dir, format_bytes, format_duration, format_progress,
    mime_from_extension, save_artifact, video_path,
};
use tokio::sync::mpsc;

use crate::{
    ApiArgs, connect,
    ui::{create_spinner, failure, success},
};

/// CLI wrapper for AspectRatio (needed for clap ValueEnum)
#[derive(Clone, Copy, Default, ValueEnum)]
enum CliAspect {
    #[default]
    Landscape,
    Portrait,
}

impl From<CliAspect> for AspectRatio {
    fn from(cli: CliAspect) -> Self {
        match cli {
            CliAspect::Landscape => AspectRatio::Landscape,
            CliAspect::Portrait => AspectRatio::Portrait,
        }
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum CliResolution {
    #[default]
    #[value(name = "720p")]
    Hd,
    #[value(name = "1080p")]
    FullHd,
}

impl From<CliResolution> for Resolution {
    fn from(cli: CliResolution) -> Self {
        match cli {
            CliResolution::Hd => Resolution::Hd,
            CliResolution::FullHd => Resolution::FullHd,
        }
    }
}

#[derive(Args)]
pub struct AnimateArgs {
    /// Picture to animate
    image: PathBuf,

    /// What should happen in the video
    #[arg(short, long, default_value = "")]
    prompt: String,

    #[arg(short, long, default_value = "landscape")]
    aspect: CliAspect,

    #[arg(short, long, default_value = "720p")]
    resolution: CliResolution,

    /// Give up waiting after this many seconds
    #[arg(long, default_value_t = 600)]
    timeout_secs: u64,

    /// Output MP4 file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: AnimateArgs, api: &ApiArgs) -> Result<()> {
    let Some(mime_type) = mime_from_extension(&args.image) else {
        bail!("Format not supported.");
    };
    let bytes = tokio::fs::read(&args.image).await?;

    let video = VideoClient::new(connect(api));
    let policy = PollPolicy::default().with_timeout(Some(Duration::from_secs(args.timeout_secs)));
    let request = GenerationRequest::new(
        ImageInput::new(bytes, mime_type),
        args.prompt,
        args.aspect.into(),
    )
    .with_resolution(args.resolution.into());
    let mut job = GenerationJob::new(request);

    let start = Instant::now();
    let spinner = create_spinner("Submitting job...");
    let (tx, mut rx) = mpsc::unbounded_channel();

    let outcome = {
        let generation = video.generate(&mut job, &policy, Some(&tx));
        tokio::pin!(generation);

        loop {
            tokio::select! {
                result = &mut generation => break Some(result),
                Some(event) = rx.recv() => spinner.set_message(format_progress(&event)),
                _ = tokio::signal::ctrl_c() => break None,
            }
        }
    };

    let artifact = match outcome {
        Some(Ok(artifact)) => artifact,
        Some(Err(e)) => {
            spinner.abandon_with_message(failure(e.user_message()));
            return Err(anyhow::Error::new(e).context("Video generation failed"));
        }
        None => {
            let operation = job
                .handle
                .as_ref()
                .map(|h| h.operation.as_str())
                .unwrap_or("not submitted");
            spinner.abandon_with_message(failure(format!(
                "Stopped waiting. The remote job may still finish: {}",
                style(operation).dim()
            )));
            return Ok(());
        }
    };

    let output = match (args.output, job.handle.as_ref()) {
        (Some(path), _) => path,
        (None, Some(handle)) => video_path(&default_output_dir(), handle.id),
        (None, None) => bail!("Completed job has no handle"),
    };
    save_artifact(&artifact, &output).await?;

    spinner.finish_with_message(success(format!(
        "Video ready: {} {}",
        format_bytes(artifact.bytes.len()),
        style(format!("[{}]", format_duration(start.elapsed()))).dim()
    )));
    println!(
        "\n{} {}\n",
        style("Saved:").dim(),
        style(output.display()).cyan()
    );
    Ok(())
}
