//! Speech-to-text adapters

mod whisper_api;

pub use whisper_api::WhisperApiTranscriber;
