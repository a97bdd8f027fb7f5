//! Romagnosi Core Library
//!
//! Orientation quiz scoring, the school assistant chat, speech synthesis and
//! image-to-video generation over the Gemini API.

pub mod api;
pub mod chat;
pub mod error;
pub mod format;
pub mod output;
pub mod provider;
pub mod quiz;
pub mod speech;
pub mod types;
pub mod video;

// Re-export commonly used items at crate root
pub use api::{ApiError, GeminiClient};
pub use chat::{
    CONNECTION_LOST_MESSAGE, ChatConfig, ChatError, ChatTurn, FAQ_ITEMS, SchoolChat,
    quiz_followup_message,
};
pub use error::{Result, RomagnosiError};
pub use format::{
    format_bytes, format_duration, format_progress, format_quiz_result, format_score_table,
};
pub use output::{default_output_dir, save_artifact, speech_path, video_path};
pub use provider::{Provider, ProviderError, Service, validate_api_key};
pub use quiz::{Category, QuizError, QuizPhase, QuizResult, QuizSession, ScoreState};
pub use speech::{SpeechClip, SpeechError, generate_speech};
pub use video::{
    AspectRatio, GenerationJob, GenerationRequest, ImageInput, JobHandle, JobProgress, JobState,
    JobStatus, PollPolicy, Resolution, VideoClient, VideoError, mime_from_extension,
};
