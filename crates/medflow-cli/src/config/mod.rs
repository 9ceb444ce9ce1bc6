//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── http: ReqwestConfig      # Backend URL, timeouts, user agent
//! ├── session: SessionConfig   # Session file, logout timeout
//! └── command: Command         # What to do
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! medflow --api-url "https://clinic.example/api" login alice --password secret
//!
//! # Or via environment variables
//! MEDFLOW_API_URL="https://clinic.example/api" medflow whoami
//! ```

mod session;

use std::process;

use anyhow::Context;
use clap::Parser;
use medflow_reqwest::ReqwestConfig;
use serde::{Deserialize, Serialize};
pub use session::SessionConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::commands::Command;
use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
///
/// Combines all configuration groups for the client:
/// - [`ReqwestConfig`]: Backend location and HTTP behavior
/// - [`SessionConfig`]: Session persistence
/// - [`Command`]: The operation to run
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "medflow")]
#[command(about = "MedFlow clinic management client")]
#[command(version)]
pub struct Cli {
    /// Backend HTTP configuration.
    #[clap(flatten)]
    pub http: ReqwestConfig,

    /// Session persistence configuration.
    #[clap(flatten)]
    pub session: SessionConfig,

    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded first so that clap's `env` fallbacks see its values.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    ///
    /// Logs go to stderr so that command output on stdout stays parseable.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.http
            .parsed_base_url()
            .context("invalid backend configuration")?;
        self.session
            .validate()
            .context("invalid session configuration")?;
        Ok(())
    }

    /// Logs configuration (no credentials).
    pub fn log(&self) {
        Self::log_build_info();

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            base_url = %self.http.base_url,
            http_timeout_secs = self.http.effective_timeout().as_secs(),
            user_agent = %self.http.effective_user_agent(),
            "Backend configuration"
        );
        self.session.log();
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
