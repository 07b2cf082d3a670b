//! OpenAI-compatible speech-to-text adapter

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;

use crate::application::ports::{Transcriber, TranscriptionError};
use crate::domain::audio::AudioMimeType;
use crate::domain::config::{DEFAULT_API_BASE_URL, DEFAULT_TRANSCRIPTION_MODEL};
use crate::domain::minutes::{LanguageHint, Transcript};

// Response types for the transcription endpoint

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Whisper transcriber over the `/audio/transcriptions` endpoint
pub struct WhisperApiTranscriber {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl WhisperApiTranscriber {
    /// Create a new transcriber with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE_URL.to_string(),
            model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Point at another OpenAI-compatible server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a custom model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Build the API URL
    fn api_url(&self) -> String {
        format!("{}/audio/transcriptions", self.base_url)
    }

    /// Build the multipart form. Temperature 0 keeps decoding deterministic.
    fn build_form(
        &self,
        bytes: Vec<u8>,
        file_name: String,
        mime_type: AudioMimeType,
        language: &LanguageHint,
    ) -> Result<multipart::Form, TranscriptionError> {
        let file_part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_type.as_str())
            .map_err(|e| TranscriptionError::RequestFailed(e.to_string()))?;

        Ok(multipart::Form::new()
            .part("file", file_part)
            .text("model", self.model.clone())
            .text("language", language.to_string())
            .text("temperature", "0")
            .text("response_format", "json"))
    }

    /// Pull the human-readable message out of an error body, if it is JSON
    fn error_message(body: &str) -> String {
        serde_json::from_str::<ErrorEnvelope>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.to_string())
    }
}

#[async_trait]
impl Transcriber for WhisperApiTranscriber {
    async fn transcribe(
        &self,
        audio: &Path,
        language: &LanguageHint,
    ) -> Result<Transcript, TranscriptionError> {
        let bytes = tokio::fs::read(audio)
            .await
            .map_err(|e| TranscriptionError::ReadFailed(e.to_string()))?;
        let file_name = audio
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.m4a".to_string());
        let mime_type = AudioMimeType::from_filename(&file_name).unwrap_or_default();

        let form = self.build_form(bytes, file_name, mime_type, language)?;

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::RequestFailed(e.to_string()))?;

        let status = response.status();

        // Handle HTTP errors
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(TranscriptionError::InvalidApiKey);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TranscriptionError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TranscriptionError::ApiError(format!(
                "HTTP {}: {}",
                status,
                Self::error_message(&error_text)
            )));
        }

        let response: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::ParseError(e.to_string()))?;

        // No speech comes back as empty or missing text
        Ok(Transcript::new(
            response.text.unwrap_or_default().trim().to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_uses_base() {
        let transcriber = WhisperApiTranscriber::new("k").with_base_url("http://localhost:1234/v1/");
        assert_eq!(
            transcriber.api_url(),
            "http://localhost:1234/v1/audio/transcriptions"
        );
    }

    #[test]
    fn default_model_and_url() {
        let transcriber = WhisperApiTranscriber::new("k");
        assert_eq!(transcriber.model, "whisper-1");
        assert!(transcriber.api_url().starts_with("https://api.openai.com/v1"));
    }

    #[test]
    fn custom_model() {
        let transcriber = WhisperApiTranscriber::new("k").with_model("gpt-4o-transcribe");
        assert_eq!(transcriber.model, "gpt-4o-transcribe");
    }

    #[test]
    fn build_form_accepts_known_mime() {
        let transcriber = WhisperApiTranscriber::new("k");
        let form = transcriber.build_form(
            vec![1, 2, 3],
            "x.m4a".to_string(),
            AudioMimeType::M4a,
            &LanguageHint::japanese(),
        );
        assert!(form.is_ok());
    }

    #[test]
    fn error_message_from_json_body() {
        let body = r#"{"error":{"message":"Invalid file format.","type":"invalid_request_error"}}"#;
        assert_eq!(WhisperApiTranscriber::error_message(body), "Invalid file format.");
        assert_eq!(WhisperApiTranscriber::error_message("oops"), "oops");
    }
}
