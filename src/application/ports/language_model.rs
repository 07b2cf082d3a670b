//! Language model port interfaces
//!
//! Correction and summary are separate ports even though one chat client
//! usually serves both: the pipeline orders them and types its inputs so a
//! summary can only ever be made from corrected text.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::minutes::{RefinedText, SummaryText, Transcript};

/// Chat completion errors
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Model returned no content")]
    EmptyResponse,

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Completion timed out after {0}")]
    TimedOut(String),
}

/// Port for grammatical correction of a raw transcript
#[async_trait]
pub trait TextRefiner: Send + Sync {
    /// Rewrite the transcript as natural text. Not idempotent: two calls
    /// on the same input may give different, equally valid output.
    async fn refine(&self, transcript: &Transcript) -> Result<RefinedText, CompletionError>;
}

/// Port for summarizing corrected text
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Produce a concise bulleted summary
    async fn summarize(&self, text: &RefinedText) -> Result<SummaryText, CompletionError>;
}
