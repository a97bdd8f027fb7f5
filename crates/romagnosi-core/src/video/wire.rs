use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use crate::video::{AspectRatio, ArtifactRef, GenerationRequest, JobStatus, Resolution};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest<'a> {
    pub instances: [Instance<'a>; 1],
    pub parameters: Parameters,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance<'a> {
    pub prompt: &'a str,
    pub image: InlineImage<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage<'a> {
    pub bytes_base64_encoded: String,
    pub mime_type: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    pub aspect_ratio: AspectRatio,
    pub resolution: Resolution,
    pub number_of_videos: u32,
}

impl<'a> PredictRequest<'a> {
    pub fn from_request(request: &'a GenerationRequest) -> Self {
        Self {
            instances: [Instance {
                prompt: &request.prompt,
                image: InlineImage {
                    bytes_base64_encoded: STANDARD.encode(&request.image.bytes),
                    mime_type: &request.image.mime_type,
                },
            }],
            parameters: Parameters {
                aspect_ratio: request.aspect_ratio,
                resolution: request.resolution,
                number_of_videos: 1,
            },
        }
    }
}

/// Long-running operation as returned by both submit and poll.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<OperationError>,
    #[serde(default)]
    pub response: Option<OperationResponse>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationError {
    #[serde(default)]
    pub code: Option<i32>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    #[serde(default)]
    pub generated_videos: Vec<GeneratedVideo>,
    #[serde(default)]
    pub generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoResponse {
    #[serde(default)]
    pub generated_samples: Vec<GeneratedVideo>,
    #[serde(default)]
    pub rai_media_filtered_reasons: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedVideo {
    #[serde(default)]
    pub video: Option<VideoRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoRef {
    #[serde(default)]
    pub uri: Option<String>,
}

impl Operation {
    fn video_uri(&self) -> Option<&str> {
        let response = self.response.as_ref()?;
        let samples = response
            .generate_video_response
            .as_ref()
            .map(|r| r.generated_samples.as_slice())
            .unwrap_or_default();

        response
            .generated_videos
            .iter()
            .chain(samples)
            .find_map(|v| v.video.as_ref()?.uri.as_deref())
            .filter(|uri| !uri.is_empty())
    }

    fn filtered_reasons(&self) -> Option<String> {
        let reasons = &self
            .response
            .as_ref()?
            .generate_video_response
            .as_ref()?
            .rai_media_filtered_reasons;

        if reasons.is_empty() {
            None
        } else {
            Some(reasons.join("; "))
        }
    }

    /// Map the raw operation onto a job status. A finished operation
    /// without a video is a failure, never an empty success.
    pub fn status(&self) -> JobStatus {
        if !self.done {
            return JobStatus::Pending;
        }

        if let Some(error) = &self.error {
            return match error.code {
                Some(code) => JobStatus::Failed(format!("{} (code {})", error.message, code)),
                None => JobStatus::Failed(error.message.clone()),
            };
        }

        match self.video_uri() {
            Some(uri) => JobStatus::Completed(ArtifactRef {
                uri: uri.to_string(),
            }),
            None => JobStatus::Failed(
                self.filtered_reasons()
                    .unwrap_or_else(|| "Video generation failed or returned no URI.".into()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::ImageInput;

    fn operation(value: serde_json::Value) -> Operation {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn predict_request_shape() {
        let request = GenerationRequest::new(
            ImageInput::new(b"png!".to_vec(), "image/png"),
            "make it fly",
            AspectRatio::Portrait,
        );

        let value = serde_json::to_value(PredictRequest::from_request(&request)).unwrap();

        assert_eq!(value["instances"][0]["prompt"], "make it fly");
        assert_eq!(value["instances"][0]["image"]["bytesBase64Encoded"], "cG5nIQ==");
        assert_eq!(value["instances"][0]["image"]["mimeType"], "image/png");
        assert_eq!(value["parameters"]["aspectRatio"], "9:16");
        assert_eq!(value["parameters"]["resolution"], "720p");
        assert_eq!(value["parameters"]["numberOfVideos"], 1);
    }

    #[test]
    fn unfinished_operation_is_pending() {
        let op = operation(serde_json::json!({"name": "models/veo/operations/1"}));
        assert_eq!(op.status(), JobStatus::Pending);
    }

    #[test]
    fn sdk_style_response_completes() {
        let op = operation(serde_json::json!({
            "name": "operations/1",
            "done": true,
            "response": {"generatedVideos": [{"video": {"uri": "https://x/v?alt=media"}}]}
        }));

        assert_eq!(
            op.status(),
            JobStatus::Completed(ArtifactRef {
                uri: "https://x/v?alt=media".into()
            })
        );
    }

    #[test]
    fn rest_style_response_completes() {
        let op = operation(serde_json::json!({
            "done": true,
            "response": {
                "@type": "type.googleapis.com/google.ai.generativelanguage.v1beta.PredictLongRunningResponse",
                "generateVideoResponse": {"generatedSamples": [{"video": {"uri": "https://x/files/abc"}}]}
            }
        }));

        assert!(matches!(op.status(), JobStatus::Completed(r) if r.uri == "https://x/files/abc"));
    }

    #[test]
    fn done_with_error_fails() {
        let op = operation(serde_json::json!({
            "done": true,
            "error": {"code": 3, "message": "bad image"}
        }));

        assert_eq!(op.status(), JobStatus::Failed("bad image (code 3)".into()));
    }

    #[test]
    fn done_without_video_fails() {
        let op = operation(serde_json::json!({"done": true, "response": {}}));
        assert!(matches!(op.status(), JobStatus::Failed(_)));

        let filtered = operation(serde_json::json!({
            "done": true,
            "response": {"generateVideoResponse": {"raiMediaFilteredReasons": ["unsafe content"]}}
        }));
        assert_eq!(filtered.status(), JobStatus::Failed("unsafe content".into()));
    }
}
