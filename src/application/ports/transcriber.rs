//! Transcription port interface

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::minutes::{LanguageHint, Transcript};

/// Transcription errors
#[derive(Debug, Clone, Error)]
pub enum TranscriptionError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Failed to read audio file: {0}")]
    ReadFailed(String),

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Transcription timed out after {0}")]
    TimedOut(String),
}

/// Port for speech-to-text
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file on disk.
    ///
    /// # Arguments
    /// * `audio` - Path to a decodable audio file
    /// * `language` - Fixed recognition language
    ///
    /// # Returns
    /// The transcript, which is blank when no speech was heard
    async fn transcribe(
        &self,
        audio: &Path,
        language: &LanguageHint,
    ) -> Result<Transcript, TranscriptionError>;
}
