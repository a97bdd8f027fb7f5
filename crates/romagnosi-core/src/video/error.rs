use std::time::Duration;

use thiserror::Error;

use crate::api::ApiError;

#[derive(Error, Debug)]
pub enum VideoError {
    #[error("Video job submission rejected: {reason}")]
    Submission {
        reason: String,
        #[source]
        source: Option<ApiError>,
    },

    #[error("Failed to read status of {operation}: {source}")]
    Polling {
        operation: String,
        #[source]
        source: ApiError,
    },

    #[error("Video job {operation} failed: {cause}")]
    JobFailed { operation: String, cause: String },

    #[error("Gave up on {operation} after {attempts} polls ({elapsed:?})")]
    Timeout {
        operation: String,
        attempts: u32,
        elapsed: Duration,
    },

    #[error("Failed to download generated video from {uri}: {reason}")]
    Download {
        uri: String,
        reason: String,
        #[source]
        source: Option<ApiError>,
    },
}

impl VideoError {
    pub(crate) fn submission(reason: impl Into<String>) -> Self {
        VideoError::Submission {
            reason: reason.into(),
            source: None,
        }
    }

    /// Short message for the end user. `Display` keeps the full cause for logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            VideoError::Submission { .. } => "Mod failed. Check API Key.",
            VideoError::Polling { .. } => "Lost contact with the shop. Try again.",
            VideoError::JobFailed { .. } => "The shop refused the job. Try another image or prompt.",
            VideoError::Timeout { .. } => "Still installing after too long. Try again later.",
            VideoError::Download { .. } => "Failed to download generated video.",
        }
    }

    /// Whether the user may reasonably retry the same request
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            VideoError::Polling { .. } | VideoError::Timeout { .. } | VideoError::Download { .. }
        )
    }
}
