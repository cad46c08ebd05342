//! Console server command

use anyhow::{Context, Result};
use console::style;
use jobpulse_console::{config::ConsoleConfig, observability, router, state::ConsoleState};
use std::net::SocketAddr;
use std::path::Path;

/// Start the console web server
#[derive(Debug, Default)]
pub struct ServeCommand {
    bind: Option<SocketAddr>,
}

impl ServeCommand {
    /// Create the command; `bind` overrides the configured listen address
    #[must_use]
    pub const fn new(bind: Option<SocketAddr>) -> Self {
        Self { bind }
    }

    /// Run until Ctrl-C
    pub async fn execute(self, config_path: Option<&Path>) -> Result<()> {
        observability::init()?;

        let mut config = ConsoleConfig::load(config_path).context("Failed to load configuration")?;
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        let bind = config.server.bind;
        let origin = config.server.origin.clone();

        let state = ConsoleState::new(config).context("Failed to initialize console state")?;
        let app = router::build(state);

        let listener = tokio::net::TcpListener::bind(bind)
            .await
            .with_context(|| format!("Failed to bind {bind}"))?;

        tracing::info!(%bind, %origin, "JobPulse console listening");
        println!(
            "{} {}",
            style("Console running at").green().bold(),
            style(&origin).cyan()
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")?;

        tracing::info!("JobPulse console stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
