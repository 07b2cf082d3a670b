//! Chonaikai minutes - meeting audio to transcript and summary over HTTP
//!
//! An uploaded recording is transcribed with a Whisper-compatible API, the
//! transcript is corrected by a chat model, and a bullet summary is produced
//! from the corrected text.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects, prompts, configuration and errors
//! - **Application**: The minutes pipeline and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (OpenAI APIs, scratch directory, config file)
//! - **API**: axum router, handlers and HTTP error mapping
//! - **CLI**: Argument parsing, config commands, signal handling and the server runner

pub mod api;
pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
