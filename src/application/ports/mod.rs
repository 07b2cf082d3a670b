//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod audio_store;
pub mod config;
pub mod language_model;
pub mod transcriber;

// Re-export common types
pub use audio_store::{AudioStore, ScratchFile, StorageError};
pub use config::ConfigStore;
pub use language_model::{CompletionError, Summarizer, TextRefiner};
pub use transcriber::{Transcriber, TranscriptionError};
