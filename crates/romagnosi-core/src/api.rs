use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error, warn};

use crate::{
    provider::{Provider, Service},
    types::{GenerateContentRequest, GenerateContentResponse},
};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Upper bound for a single request, body included
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Api error: {status} - {body}")]
    Api { status: StatusCode, body: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Whether repeating the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Http(e) => {
                // A body cut off mid-stream surfaces as a body or decode error
                e.is_timeout() || e.is_connect() || e.is_request() || e.is_body() || e.is_decode()
            }
            ApiError::Api { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            ApiError::Malformed(_) => false,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http(e) => e.status(),
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Malformed(_) => None,
        }
    }
}

/// Thin HTTP client for the Gemini REST API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    provider: Provider,
}

impl GeminiClient {
    pub fn new(provider: Provider) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });
        Self::with_http(http, provider)
    }

    pub fn with_http(http: Client, provider: Provider) -> Self {
        Self { http, provider }
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    pub async fn generate_content(
        &self,
        service: Service,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ApiError> {
        let url = self.provider.endpoint(service);
        self.post_json(&url, request).await
    }

    pub async fn post_json<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<R, ApiError> {
        debug!("GeminiClient sending request to: {}", url);
        let response = self
            .http
            .post(url)
            .header("content-type", "application/json")
            .header(API_KEY_HEADER, self.provider.api_key())
            .json(body)
            .send()
            .await?;

        Self::read_json(url, response).await
    }

    pub async fn get_json<R: DeserializeOwned>(&self, url: &str) -> Result<R, ApiError> {
        debug!("GeminiClient polling: {}", url);
        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, self.provider.api_key())
            .send()
            .await?;

        Self::read_json(url, response).await
    }

    /// Fetch raw bytes from a download link, appending the API key as `key`
    pub async fn get_bytes(&self, uri: &str) -> Result<Vec<u8>, ApiError> {
        let url = authorized_url(uri, self.provider.api_key())?;
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or("No body".into());
            error!("GeminiClient download failed: {} - {}", status, body);
            return Err(ApiError::Api { status, body });
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn read_json<R: DeserializeOwned>(
        url: &str,
        response: reqwest::Response,
    ) -> Result<R, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or("No body".into());
            error!("GeminiClient request to {} failed: {} - {}", url, status, body);
            return Err(ApiError::Api { status, body });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Malformed(format!("{e}: {body}")))
    }
}

/// Append the API key to a download link as the `key` query parameter
pub fn authorized_url(uri: &str, api_key: &str) -> Result<Url, ApiError> {
    let mut url =
        Url::parse(uri).map_err(|e| ApiError::Malformed(format!("invalid uri {uri}: {e}")))?;
    url.query_pairs_mut().append_pair("key", api_key);
    Ok(url)
}
