use std::fmt;

pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const API_KEY_FALLBACK_ENV: &str = "API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Missing API key: set the {env_var} (or {fallback_var}) environment variable")]
    MissingApiKey {
        env_var: &'static str,
        fallback_var: &'static str,
    },
}

/// Remote services used by the assistant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Service {
    Chat,
    Speech,
    Video,
}

pub struct ServiceConfig {
    pub model: &'static str,
    pub method: &'static str,
}

impl Service {
    pub fn config(&self) -> ServiceConfig {
        match self {
            Service::Chat => ServiceConfig {
                model: "gemini-2.5-flash",
                method: "generateContent",
            },
            Service::Speech => ServiceConfig {
                model: "gemini-2.5-flash-preview-tts",
                method: "generateContent",
            },
            Service::Video => ServiceConfig {
                model: "veo-3.1-fast-generate-preview",
                method: "predictLongRunning",
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Service::Chat => "Chat",
            Service::Speech => "Speech",
            Service::Video => "Veo",
        }
    }
}

/// Connection settings for the Gemini API.
#[derive(Clone)]
pub struct Provider {
    api_url: String,
    api_key: String,
    chat_model: String,
    speech_model: String,
    video_model: String,
}

impl Provider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_url: GEMINI_API_URL.to_string(),
            api_key: api_key.into(),
            chat_model: Service::Chat.config().model.to_string(),
            speech_model: Service::Speech.config().model.to_string(),
            video_model: Service::Video.config().model.to_string(),
        }
    }

    /// Build a provider from the API key found in the environment
    pub fn from_env() -> Result<Self, ProviderError> {
        validate_api_key().map(Self::new)
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, service: Service, model: impl Into<String>) -> Self {
        let model = model.into();
        match service {
            Service::Chat => self.chat_model = model,
            Service::Speech => self.speech_model = model,
            Service::Video => self.video_model = model,
        }
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model(&self, service: Service) -> &str {
        match service {
            Service::Chat => &self.chat_model,
            Service::Speech => &self.speech_model,
            Service::Video => &self.video_model,
        }
    }

    /// Full URL of the model method backing `service`
    pub fn endpoint(&self, service: Service) -> String {
        format!(
            "{}/models/{}:{}",
            self.api_url,
            self.model(service),
            service.config().method
        )
    }

    /// URL of a long-running operation returned by the video endpoint
    pub fn operation_url(&self, operation: &str) -> String {
        format!("{}/{}", self.api_url, operation.trim_start_matches('/'))
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("chat_model", &self.chat_model)
            .field("speech_model", &self.speech_model)
            .field("video_model", &self.video_model)
            .finish()
    }
}

/// Validate that an API key is set in the environment
pub fn validate_api_key() -> Result<String, ProviderError> {
    [API_KEY_ENV, API_KEY_FALLBACK_ENV]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|key| !key.trim().is_empty())
        .ok_or(ProviderError::MissingApiKey {
            env_var: API_KEY_ENV,
            fallback_var: API_KEY_FALLBACK_ENV,
        })
}
