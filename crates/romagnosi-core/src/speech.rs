use std::{path::Path, time::Duration};

use base64::{Engine, engine::general_purpose::STANDARD};
use tracing::{debug, warn};

use crate::{
    api::{ApiError, GeminiClient},
    provider::Service,
    types::{
        Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, InlineData,
        PrebuiltVoiceConfig, SpeechConfig, VoiceConfig,
    },
};

pub const VOICE_NAME: &str = "Fenrir";
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("Text to speak is empty")]
    EmptyText,

    #[error("Speech request failed: {0}")]
    Api(#[from] ApiError),

    #[error("No audio generated")]
    NoAudio,

    #[error("Failed to decode audio: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("Failed to write WAV file: {0}")]
    Wav(#[from] hound::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Mono 16-bit PCM returned by the speech model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechClip {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

impl SpeechClip {
    pub fn from_inline_data(data: &InlineData) -> Result<Self, SpeechError> {
        let bytes = STANDARD.decode(data.data.as_bytes())?;
        if bytes.len() < 2 {
            return Err(SpeechError::NoAudio);
        }
        if bytes.len() % 2 != 0 {
            warn!(len = bytes.len(), "odd-length 16-bit PCM, dropping the trailing byte");
        }

        let samples = bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        Ok(Self {
            samples,
            sample_rate: sample_rate_from_mime(&data.mime_type).unwrap_or(DEFAULT_SAMPLE_RATE),
        })
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate.max(1) as f64)
    }

    pub fn write_wav(&self, path: &Path) -> Result<(), SpeechError> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(path, spec)?;
        for &sample in &self.samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        Ok(())
    }

    /// `write_wav` on the blocking pool
    pub async fn save_wav(&self, path: &Path) -> Result<(), SpeechError> {
        let clip = self.clone();
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || clip.write_wav(&path))
            .await
            .map_err(std::io::Error::other)?
    }
}

/// Read the `rate=` parameter of a mime type such as `audio/L16;codec=pcm;rate=24000`
pub fn sample_rate_from_mime(mime_type: &str) -> Option<u32> {
    mime_type
        .split(';')
        .filter_map(|param| param.trim().strip_prefix("rate="))
        .find_map(|rate| rate.parse().ok())
}

pub fn speech_request(text: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        system_instruction: None,
        contents: vec![Content::text(None, text)],
        generation_config: Some(GenerationConfig {
            response_modalities: Some(vec!["AUDIO".to_string()]),
            speech_config: Some(SpeechConfig {
                voice_config: VoiceConfig {
                    prebuilt_voice_config: PrebuiltVoiceConfig {
                        voice_name: VOICE_NAME.to_string(),
                    },
                },
            }),
            ..Default::default()
        }),
    }
}

pub fn clip_from_response(response: &GenerateContentResponse) -> Result<SpeechClip, SpeechError> {
    let data = response.first_inline_data().ok_or(SpeechError::NoAudio)?;
    SpeechClip::from_inline_data(data)
}

/// Read `text` aloud with the prebuilt voice
pub async fn generate_speech(client: &GeminiClient, text: &str) -> Result<SpeechClip, SpeechError> {
    if text.trim().is_empty() {
        return Err(SpeechError::EmptyText);
    }

    let response = client
        .generate_content(Service::Speech, &speech_request(text))
        .await?;
    let clip = clip_from_response(&response)?;
    debug!(samples = clip.samples.len(), rate = clip.sample_rate, "speech generated");
    Ok(clip)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio_response(samples: &[i16], mime_type: &str) -> GenerateContentResponse {
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"parts": [{
                "inlineData": {"mimeType": mime_type, "data": STANDARD.encode(bytes)}
            }]}}]
        }))
        .unwrap()
    }

    #[test]
    fn request_asks_for_audio_with_voice() {
        let value = serde_json::to_value(speech_request("Benvenuti!")).unwrap();

        assert_eq!(value["contents"][0]["parts"][0]["text"], "Benvenuti!");
        assert_eq!(value["generationConfig"]["responseModalities"][0], "AUDIO");
        assert_eq!(
            value["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
            "Fenrir"
        );
    }

    #[test]
    fn decodes_little_endian_pcm() {
        let response = audio_response(&[0, 1, -1, i16::MAX], "audio/L16;codec=pcm;rate=16000");

        let clip = clip_from_response(&response).unwrap();

        assert_eq!(clip.samples, vec![0, 1, -1, i16::MAX]);
        assert_eq!(clip.sample_rate, 16_000);
    }

    #[test]
    fn trailing_odd_byte_is_dropped() {
        let data = InlineData {
            mime_type: "audio/L16;codec=pcm;rate=24000".into(),
            data: STANDARD.encode([0x01, 0x00, 0xff, 0x7f, 0x09]),
        };

        let clip = SpeechClip::from_inline_data(&data).unwrap();

        assert_eq!(clip.samples, vec![1, i16::MAX]);
    }

    #[test]
    fn missing_audio_is_an_error() {
        let response = GenerateContentResponse::default();
        assert!(matches!(
            clip_from_response(&response),
            Err(SpeechError::NoAudio)
        ));
    }

    #[test]
    fn sample_rate_defaults_when_absent() {
        assert_eq!(sample_rate_from_mime("audio/L16;codec=pcm;rate=24000"), Some(24_000));
        assert_eq!(sample_rate_from_mime("audio/pcm"), None);
    }

    #[test]
    fn wav_round_trip_keeps_samples() {
        let clip = SpeechClip {
            samples: (0..2400).map(|i| (i % 128) as i16).collect(),
            sample_rate: DEFAULT_SAMPLE_RATE,
        };
        let path = std::env::temp_dir().join(format!("romagnosi-{}.wav", uuid::Uuid::new_v4()));

        clip.write_wav(&path).unwrap();
        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(spec.sample_rate, DEFAULT_SAMPLE_RATE);
        assert_eq!(spec.channels, 1);
        assert_eq!(samples, clip.samples);
        assert_eq!(clip.duration(), Duration::from_millis(100));
    }

    #[tokio::test]
    async fn save_wav_writes_off_the_runtime() {
        let clip = SpeechClip {
            samples: vec![0, 100, -100, 0],
            sample_rate: 16_000,
        };
        let path = std::env::temp_dir().join(format!("romagnosi-{}.wav", uuid::Uuid::new_v4()));

        clip.save_wav(&path).await.unwrap();
        let mut reader = hound::WavReader::open(&path).unwrap();
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(reader.spec().sample_rate, 16_000);
        assert_eq!(samples, clip.samples);
    }
}
