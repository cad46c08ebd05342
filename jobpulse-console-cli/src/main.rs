//! jobpulse-console CLI tool

use anyhow::Result;
use clap::Parser;
use jobpulse_console_cli::{CheckConfigCommand, Cli, Command, LogoutCommand, ServeCommand};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Command::Serve { bind } => {
            ServeCommand::new(bind).execute(config).await?;
        }
        Command::CheckConfig => {
            CheckConfigCommand::execute(config)?;
        }
        Command::Logout => {
            LogoutCommand::execute(config)?;
        }
    }

    Ok(())
}
