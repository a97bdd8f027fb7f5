use std::{
    fmt,
    path::Path,
    sync::{Arc, OnceLock},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use uuid::Uuid;

use crate::video::VideoError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    #[default]
    #[serde(rename = "720p")]
    Hd,
    #[serde(rename = "1080p")]
    FullHd,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Hd => "720p",
            Resolution::FullHd => "1080p",
        }
    }
}

/// Guess an image MIME type from a file extension
pub fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        "heif" => "image/heif",
        _ => return None,
    };
    Some(mime)
}

#[derive(Clone, PartialEq, Eq)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImageInput {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    pub fn validate(&self) -> Result<(), VideoError> {
        if !self.mime_type.starts_with("image/") {
            return Err(VideoError::submission(format!(
                "unsupported input type {:?}, expected an image",
                self.mime_type
            )));
        }
        if self.bytes.is_empty() {
            return Err(VideoError::submission("image payload is empty"));
        }
        Ok(())
    }
}

impl fmt::Debug for ImageInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageInput")
            .field("bytes", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub image: ImageInput,
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub resolution: Resolution,
}

impl GenerationRequest {
    pub fn new(image: ImageInput, prompt: impl Into<String>, aspect_ratio: AspectRatio) -> Self {
        Self {
            image,
            prompt: prompt.into(),
            aspect_ratio,
            resolution: Resolution::default(),
        }
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }
}

/// Pointer to the generated video; the bytes need a second request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Completed(ArtifactRef),
    Failed(String),
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending)
    }
}

/// Opaque handle of a submitted job.
///
/// Clones share the terminal status, so once one of them observes a
/// terminal state every later poll reports the same one.
#[derive(Debug, Clone)]
pub struct JobHandle {
    pub id: Uuid,
    pub operation: String,
    pub submitted_at: Instant,
    terminal: Arc<OnceLock<JobStatus>>,
}

impl JobHandle {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            operation: operation.into(),
            submitted_at: Instant::now(),
            terminal: Arc::new(OnceLock::new()),
        }
    }

    pub fn terminal_status(&self) -> Option<&JobStatus> {
        self.terminal.get()
    }

    /// Record `status` if it is terminal and return the status callers see
    pub(crate) fn settle(&self, status: JobStatus) -> JobStatus {
        if status.is_terminal() {
            self.terminal.get_or_init(|| status).clone()
        } else {
            self.terminal.get().cloned().unwrap_or(status)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Created,
    Submitted,
    Pending,
    Completed,
    Failed,
    TimedOut,
}

/// Downloaded video content.
#[derive(Clone, PartialEq, Eq)]
pub struct Artifact {
    pub uri: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifact")
            .field("uri", &self.uri)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Progress reported while a job runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobProgress {
    Submitted { operation: String },
    Pending { attempt: u32, elapsed: Duration },
    Retrying { attempt: u32, reason: String },
    Downloading { uri: String },
    Completed { bytes: usize },
    Failed { cause: String },
    TimedOut { elapsed: Duration },
}

/// One generation attempt owned by the caller.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub request: GenerationRequest,
    pub state: JobState,
    pub handle: Option<JobHandle>,
}

impl GenerationJob {
    pub fn new(request: GenerationRequest) -> Self {
        Self {
            request,
            state: JobState::Created,
            handle: None,
        }
    }
}
