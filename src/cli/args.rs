//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

use super::config_cmd::validate_config_value;

/// Chonaikai minutes - turn meeting recordings into transcripts and summaries
#[derive(Parser, Debug)]
#[command(name = "chonaikai-minutes")]
#[command(version)]
#[command(about = "HTTP service that transcribes, corrects and summarizes meeting audio")]
#[command(long_about = None)]
pub struct Cli {
    /// Listen address (e.g., 127.0.0.1:8000)
    #[arg(short = 'b', long, env = "MINUTES_BIND", value_name = "ADDR")]
    pub bind: Option<String>,

    /// Directory for uploads in flight
    #[arg(short = 's', long, env = "MINUTES_SCRATCH_DIR", value_name = "DIR")]
    pub scratch_dir: Option<String>,

    /// Recognition language (ISO 639 code, e.g., ja)
    #[arg(short = 'l', long, value_name = "LANG")]
    pub language: Option<String>,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Validated overrides for the merged config
    pub fn overrides(&self) -> Result<AppConfig, ConfigError> {
        if let Some(bind) = &self.bind {
            validate_config_value("bind", bind)?;
        }
        if let Some(language) = &self.language {
            validate_config_value("language", language)?;
        }

        Ok(AppConfig {
            bind: self.bind.clone(),
            scratch_dir: self.scratch_dir.clone(),
            language: self.language.clone(),
            ..AppConfig::empty()
        })
    }
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "api_key",
    "api_base_url",
    "transcription_model",
    "completion_model",
    "language",
    "bind",
    "scratch_dir",
    "transcription_timeout",
    "completion_timeout",
    "max_upload_mb",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
