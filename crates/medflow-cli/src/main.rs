#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod commands;
mod config;

use std::process;
use std::sync::Arc;

use anyhow::Context;
use medflow_api::ApiClient;
use medflow_reqwest::ReqwestClient;
use medflow_session::{FileStore, SessionManager};
use tokio::signal::ctrl_c;
use tokio_util::sync::CancellationToken;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "medflow_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "medflow_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "medflow_cli::config";
pub const TRACING_TARGET_COMMAND: &str = "medflow_cli::command";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::debug!(
            target: TRACING_TARGET_SHUTDOWN,
            "command completed successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %format!("{error:#}"),
            "command failed"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();
    cli.validate()?;

    let client = create_client(&cli)?;
    let cancel = cancel_on_interrupt();

    let output = cli.command.execute(&client, cancel).await?;
    println!("{output}");

    Ok(())
}

/// Creates the resource client over a file-backed session.
fn create_client(cli: &Cli) -> anyhow::Result<ApiClient> {
    let transport =
        ReqwestClient::new(cli.http.clone()).context("failed to create HTTP client")?;
    let store = FileStore::new(&cli.session.session_file);

    let session = SessionManager::with_options(
        Arc::new(transport),
        Arc::new(store),
        cli.session.session_options(),
    )
    .context("failed to load stored session")?;

    Ok(ApiClient::new(session))
}

/// Returns a token cancelled on Ctrl+C, so that in-flight backend calls stop
/// without touching the stored session.
fn cancel_on_interrupt() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    tokio::spawn(async move {
        if let Err(e) = ctrl_c().await {
            tracing::error!(
                target: TRACING_TARGET_SHUTDOWN,
                error = %e,
                "Failed to install Ctrl+C handler"
            );
            return;
        }

        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            "Received Ctrl+C signal, cancelling"
        );
        token.cancel();
    });

    cancel
}
