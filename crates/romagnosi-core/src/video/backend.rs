use async_trait::async_trait;

use crate::{
    api::{ApiError, GeminiClient},
    provider::Service,
    video::{GenerationRequest, wire::{Operation, PredictRequest}},
};

/// Transport for the video-generation endpoint.
#[async_trait]
pub trait VideoBackend: Send + Sync {
    /// Start a job and return the operation name
    async fn create_operation(&self, request: &GenerationRequest) -> Result<String, ApiError>;

    async fn fetch_operation(&self, operation: &str) -> Result<Operation, ApiError>;

    async fn download(&self, uri: &str) -> Result<Vec<u8>, ApiError>;
}

#[async_trait]
impl VideoBackend for GeminiClient {
    async fn create_operation(&self, request: &GenerationRequest) -> Result<String, ApiError> {
        let url = self.provider().endpoint(Service::Video);
        let body = PredictRequest::from_request(request);
        let operation: Operation = self.post_json(&url, &body).await?;

        if operation.name.is_empty() {
            return Err(ApiError::Malformed(
                "video endpoint returned no operation name".into(),
            ));
        }
        Ok(operation.name)
    }

    async fn fetch_operation(&self, operation: &str) -> Result<Operation, ApiError> {
        let url = self.provider().operation_url(operation);
        self.get_json(&url).await
    }

    async fn download(&self, uri: &str) -> Result<Vec<u8>, ApiError> {
        self.get_bytes(uri).await
    }
}
