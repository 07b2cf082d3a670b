//! Server runner

use std::env;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::{build_router, AppState};
use crate::application::ports::ConfigStore;
use crate::application::{GenerateMinutesUseCase, PipelineSettings};
use crate::domain::config::AppConfig;
use crate::infrastructure::{
    ChatCompletionClient, ScratchDirStore, WhisperApiTranscriber, XdgConfigStore,
};

use super::signals::shutdown_signal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// The use case as wired for production
pub type MinutesService = GenerateMinutesUseCase<
    ScratchDirStore,
    WhisperApiTranscriber,
    ChatCompletionClient,
    ChatCompletionClient,
>;

/// Install the tracing subscriber; `RUST_LOG` overrides the `info` default
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %store.path().display(), error = %e, "Ignoring unreadable config file");
            AppConfig::empty()
        }
    };

    let env_config = AppConfig {
        api_key: env::var("OPENAI_API_KEY").ok().filter(|s| !s.is_empty()),
        api_base_url: env::var("OPENAI_BASE_URL").ok().filter(|s| !s.is_empty()),
        ..AppConfig::empty()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

/// Wire adapters into the use case.
///
/// Without an API key the clients are left out and every request is
/// answered with the service-unavailable fault.
pub fn build_service(config: &AppConfig) -> MinutesService {
    let (transcriber, completion) = match config.api_key() {
        Some(key) => {
            let transcriber = WhisperApiTranscriber::new(key)
                .with_base_url(config.api_base_url_or_default())
                .with_model(config.transcription_model_or_default());
            let completion = ChatCompletionClient::new(key)
                .with_base_url(config.api_base_url_or_default())
                .with_model(config.completion_model_or_default());
            (Some(transcriber), Some(completion))
        }
        None => {
            error!("No API key configured. Set OPENAI_API_KEY or run 'chonaikai-minutes config set api_key <key>'");
            (None, None)
        }
    };

    let settings = PipelineSettings {
        language: config.language_or_default(),
        transcription_timeout: config.transcription_timeout_or_default(),
        completion_timeout: config.completion_timeout_or_default(),
    };

    GenerateMinutesUseCase::new(
        ScratchDirStore::new(config.scratch_dir_or_default()),
        transcriber,
        completion.clone(),
        completion,
        settings,
    )
}

/// Serve HTTP until SIGINT/SIGTERM
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let service = build_service(&config);
    let state = AppState::new(Arc::new(service), config.max_upload_bytes());
    let shutdown = state.shutdown.clone();
    let app = build_router(state);

    let bind = config.bind_or_default();
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;

    info!(
        addr = %listener.local_addr()?,
        scratch_dir = config.scratch_dir_or_default(),
        language = %config.language_or_default(),
        "Minutes server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::MinutesGenerator;

    #[test]
    fn service_without_key_is_not_ready() {
        let service = build_service(&AppConfig::defaults());
        assert!(!service.is_ready());
    }

    #[test]
    fn service_with_key_is_ready() {
        let config = AppConfig {
            api_key: Some("sk-test".to_string()),
            ..AppConfig::defaults()
        };
        let service = build_service(&config);
        assert!(MinutesGenerator::is_ready(&service));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = AppConfig {
            api_key: Some("   ".to_string()),
            ..AppConfig::defaults()
        };
        assert!(!build_service(&config).is_ready());
    }
}
