//! Sign-out command

use anyhow::{Context, Result};
use console::style;
use jobpulse_console::auth::SessionStore;
use jobpulse_console::config::ConsoleConfig;
use jobpulse_console::storage::{FileStore, MemoryStore, Storage};
use std::path::Path;

/// Remove the stored session without starting the server
pub struct LogoutCommand;

impl LogoutCommand {
    /// Execute the command
    pub fn execute(config_path: Option<&Path>) -> Result<()> {
        let config = ConsoleConfig::load(config_path).context("Failed to load configuration")?;

        if Self::clear_session(&config)? {
            println!("{}", style("Signed out.").green().bold());
        } else {
            println!("{}", style("No stored session.").dim());
        }

        Ok(())
    }

    /// Clear the durable session; returns whether one existed
    pub fn clear_session(config: &ConsoleConfig) -> Result<bool> {
        let durable = FileStore::open(config.storage.durable_store_path())
            .context("Failed to open console storage")?;
        let sessions = SessionStore::load(Storage::new(durable, MemoryStore::new()))?;

        let was_signed_in = sessions.is_authenticated();
        sessions.clear()?;
        Ok(was_signed_in)
    }
}
