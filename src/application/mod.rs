//! Application layer - Use cases and port interfaces
//!
//! Contains the minutes pipeline and the trait definitions
//! for external system interactions.

pub mod minutes;
pub mod ports;

// Re-export use cases
pub use minutes::{GenerateMinutesUseCase, MinutesError, MinutesGenerator, PipelineSettings};
