//! jobpulse-console CLI library
//!
//! Argument parsing and command implementations, kept out of `main.rs` so
//! they can be tested.

#![allow(clippy::missing_errors_doc)]

pub mod commands;

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

pub use commands::{CheckConfigCommand, LogoutCommand, ServeCommand};

/// Command line of the `jobpulse-console` binary
#[derive(Debug, Parser)]
#[command(name = "jobpulse-console")]
#[command(version)]
#[command(about = "Local dashboard for the JobPulse job scheduler", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./jobpulse.toml)
    #[arg(long, short, global = true, env = "JOBPULSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the console web server
    Serve {
        /// Listen address, overriding `server.bind`
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Load and validate the configuration, then print a summary
    CheckConfig,
    /// Forget the stored session
    Logout,
}
