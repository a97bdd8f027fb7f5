use thiserror::Error;

use crate::{
    api::ApiError, chat::ChatError, provider::ProviderError, quiz::QuizError,
    speech::SpeechError, video::VideoError,
};

#[derive(Error, Debug)]
pub enum RomagnosiError {
    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error(transparent)]
    Video(#[from] VideoError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error(transparent)]
    Speech(#[from] SpeechError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("API request failed: {0}")]
    Api(#[from] ApiError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RomagnosiError>;
