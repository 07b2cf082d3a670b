//! Pipeline text values
//!
//! Each stage produces exactly one of these, consumed by the next stage.
//! None of them outlive the request.

use serde::Serialize;

/// Raw speech-to-text output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    text: String,
}

impl Transcript {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// True when recognition heard no speech at all
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Grammatically corrected transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RefinedText {
    text: String,
}

impl RefinedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Bulleted summary of the corrected transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SummaryText {
    text: String,
}

impl SummaryText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Successful pipeline outcome, serialized as `{"full_text", "summary"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Minutes {
    pub full_text: RefinedText,
    pub summary: SummaryText,
}
