//! cli
//!
//! Command-line interface layer for Atomix.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Initialise logging and load the configuration
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Handlers get a [`Context`] holding the loaded
//! config, the override flags and the connector, and reach the cluster only
//! through [`crate::client::Resolver`].

pub mod args;
pub mod commands;

pub use args::Cli;

use anyhow::{Context as _, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::client::{Connector, HttpConnector, Resolver};
use crate::core::config::Config;
use crate::core::naming::Overrides;

/// Per-invocation state shared by command handlers.
pub struct Context {
    pub config: Config,
    pub overrides: Overrides,
    pub timeout: Duration,
    pub connector: Arc<dyn Connector>,
}

impl Context {
    /// Resolver over this invocation's config and overrides.
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(
            self.connector.as_ref(),
            &self.config,
            &self.overrides,
            self.timeout,
        )
    }

    /// Drive an async command body to completion.
    pub fn block_on<F: Future>(&self, fut: F) -> Result<F::Output> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start async runtime")?;
        Ok(rt.block_on(fut))
    }
}

/// Run the CLI application against the HTTP controller client.
///
/// This is the main entry point called from `main.rs`.
pub fn run(cli: Cli) -> Result<()> {
    run_with(cli, Arc::new(HttpConnector))
}

/// Run the CLI application with a specific connector.
pub fn run_with(cli: Cli, connector: Arc<dyn Connector>) -> Result<()> {
    init_logging(cli.debug);

    let config = Config::load(cli.config.as_deref())?;
    debug!(path = ?config.loaded_from(), "loaded config");

    let ctx = Context {
        config,
        overrides: cli.client.into(),
        timeout: cli.timeout,
        connector,
    };

    commands::dispatch(cli.command, &ctx)
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins over `--debug`. Calling this twice is harmless.
fn init_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if debug {
            "warn,atomix_cli=debug"
        } else {
            "warn"
        })
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
