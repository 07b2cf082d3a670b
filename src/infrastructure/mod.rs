//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces:
//! the scratch directory, OpenAI-compatible speech and chat APIs,
//! and the TOML config file.

pub mod completion;
pub mod config;
pub mod storage;
pub mod transcription;

// Re-export adapters
pub use completion::ChatCompletionClient;
pub use config::XdgConfigStore;
pub use storage::ScratchDirStore;
pub use transcription::WhisperApiTranscriber;
