//! Configuration domain module

mod app_config;

pub use app_config::{
    AppConfig, DEFAULT_API_BASE_URL, DEFAULT_BIND, DEFAULT_COMPLETION_MODEL,
    DEFAULT_MAX_UPLOAD_MB, DEFAULT_SCRATCH_DIR, DEFAULT_TRANSCRIPTION_MODEL,
};
