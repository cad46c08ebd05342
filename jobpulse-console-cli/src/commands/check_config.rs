//! Configuration check command

use anyhow::{Context, Result};
use console::style;
use jobpulse_console::config::ConsoleConfig;
use jobpulse_console::oauth2::OAuthProvider;
use std::path::Path;

/// Load and validate the configuration, then print what the server would use
pub struct CheckConfigCommand;

impl CheckConfigCommand {
    /// Execute the command
    pub fn execute(config_path: Option<&Path>) -> Result<()> {
        let config = ConsoleConfig::load(config_path).context("Configuration is invalid")?;

        println!("{}", style("Configuration OK").green().bold());
        println!();
        for line in summary(&config) {
            println!("  {line}");
        }

        Ok(())
    }
}

/// One line per setting the operator usually cares about
#[must_use]
pub fn summary(config: &ConsoleConfig) -> Vec<String> {
    let provider = |p: OAuthProvider| {
        let state = if config.oauth2.is_provider_configured(p) {
            "configured"
        } else {
            "disabled"
        };
        format!("{:<10} {state}", p.display_name())
    };

    vec![
        format!("{:<10} {}", "Listen", config.server.bind),
        format!("{:<10} {}", "Origin", config.server.origin),
        format!("{:<10} {}", "Backend", config.backend.api_url),
        format!(
            "{:<10} {}",
            "Storage",
            config.storage.durable_store_path().display()
        ),
        provider(OAuthProvider::Google),
        provider(OAuthProvider::GitHub),
    ]
}
