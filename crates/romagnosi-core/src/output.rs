use std::path::{Path, PathBuf};

use tracing::info;
use uuid::Uuid;

use crate::{error::Result, video::Artifact};

/// Where generated media lands when no path is given
pub fn default_output_dir() -> PathBuf {
    dirs::video_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("romagnosi")
}

pub fn video_path(dir: &Path, job_id: Uuid) -> PathBuf {
    dir.join(format!("romagnosi-{}.mp4", job_id))
}

pub fn speech_path(dir: &Path) -> PathBuf {
    dir.join(format!("romagnosi-speech-{}.wav", Uuid::new_v4()))
}

/// Write a downloaded artifact, creating parent directories
pub async fn save_artifact(artifact: &Artifact, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, &artifact.bytes).await?;
    info!(path = %path.display(), bytes = artifact.bytes.len(), "artifact saved");
    Ok(())
}
