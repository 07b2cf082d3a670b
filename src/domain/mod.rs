//! Domain layer - Core business logic
//!
//! Contains value objects for uploads, pipeline texts and configuration,
//! plus domain errors. This layer has no dependencies on external systems.

pub mod audio;
pub mod config;
pub mod error;
pub mod minutes;
pub mod timing;

// Re-export common types
pub use audio::{AudioMimeType, AudioUpload};
pub use config::AppConfig;
pub use error::*;
pub use minutes::{
    ChatPrompt, LanguageHint, Minutes, PipelineStage, RefinedText, SummaryText, Transcript,
};
pub use timing::Duration;
