//! Chonaikai minutes server entry point

use std::process::ExitCode;

use clap::Parser;

use chonaikai_minutes::cli::{
    app::{init_tracing, load_merged_config, run_server, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use chonaikai_minutes::infrastructure::XdgConfigStore;

#[tokio::main]
async fn main() -> ExitCode {
    let mut cli = Cli::parse();
    let presenter = Presenter::new();

    if let Some(Commands::Config { action }) = cli.command.take() {
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    let cli_config = match cli.overrides() {
        Ok(config) => config,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    init_tracing();
    let config = load_merged_config(cli_config).await;

    match run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            presenter.error(&format!("{:#}", e));
            ExitCode::from(EXIT_ERROR)
        }
    }
}
