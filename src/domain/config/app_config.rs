//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::minutes::LanguageHint;
use crate::domain::timing::Duration;

/// Default OpenAI-compatible API root
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";

/// Default speech-to-text model
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Default chat model for correction and summary
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-4o";

/// Default listen address
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Default scratch directory for uploads in flight
pub const DEFAULT_SCRATCH_DIR: &str = "./temp_audio";

/// Default request body cap in megabytes
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 100;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub transcription_model: Option<String>,
    pub completion_model: Option<String>,
    pub language: Option<String>,
    pub bind: Option<String>,
    pub scratch_dir: Option<String>,
    pub transcription_timeout: Option<String>,
    pub completion_timeout: Option<String>,
    pub max_upload_mb: Option<u64>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            api_key: None,
            api_base_url: Some(DEFAULT_API_BASE_URL.to_string()),
            transcription_model: Some(DEFAULT_TRANSCRIPTION_MODEL.to_string()),
            completion_model: Some(DEFAULT_COMPLETION_MODEL.to_string()),
            language: Some(LanguageHint::default().to_string()),
            bind: Some(DEFAULT_BIND.to_string()),
            scratch_dir: Some(DEFAULT_SCRATCH_DIR.to_string()),
            transcription_timeout: Some(Duration::default_transcription_timeout().to_string()),
            completion_timeout: Some(Duration::default_completion_timeout().to_string()),
            max_upload_mb: Some(DEFAULT_MAX_UPLOAD_MB),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            api_base_url: other.api_base_url.or(self.api_base_url),
            transcription_model: other.transcription_model.or(self.transcription_model),
            completion_model: other.completion_model.or(self.completion_model),
            language: other.language.or(self.language),
            bind: other.bind.or(self.bind),
            scratch_dir: other.scratch_dir.or(self.scratch_dir),
            transcription_timeout: other.transcription_timeout.or(self.transcription_timeout),
            completion_timeout: other.completion_timeout.or(self.completion_timeout),
            max_upload_mb: other.max_upload_mb.or(self.max_upload_mb),
        }
    }

    /// Get API key if set and non-empty
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// Get API base URL without a trailing slash
    pub fn api_base_url_or_default(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn transcription_model_or_default(&self) -> &str {
        self.transcription_model
            .as_deref()
            .unwrap_or(DEFAULT_TRANSCRIPTION_MODEL)
    }

    pub fn completion_model_or_default(&self) -> &str {
        self.completion_model
            .as_deref()
            .unwrap_or(DEFAULT_COMPLETION_MODEL)
    }

    /// Get language as parsed LanguageHint, or Japanese if not set/invalid
    pub fn language_or_default(&self) -> LanguageHint {
        self.language
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    pub fn bind_or_default(&self) -> &str {
        self.bind.as_deref().unwrap_or(DEFAULT_BIND)
    }

    pub fn scratch_dir_or_default(&self) -> &str {
        self.scratch_dir.as_deref().unwrap_or(DEFAULT_SCRATCH_DIR)
    }

    /// Get transcription timeout as parsed Duration, or default if not set/invalid
    pub fn transcription_timeout_or_default(&self) -> Duration {
        self.transcription_timeout
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_transcription_timeout)
    }

    /// Get completion timeout as parsed Duration, or default if not set/invalid
    pub fn completion_timeout_or_default(&self) -> Duration {
        self.completion_timeout
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_completion_timeout)
    }

    /// Get the body cap in bytes
    pub fn max_upload_bytes(&self) -> usize {
        let mb = self.max_upload_mb.unwrap_or(DEFAULT_MAX_UPLOAD_MB);
        usize::try_from(mb.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX)
    }
}
