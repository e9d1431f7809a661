//! vmgr command line tool
//!
//! Loads layered settings, connects an [`vmgr_client::EngineClient`] and
//! dispatches the parsed subcommand. Results are printed as pretty JSON.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod settings;

use cli::{Cli, Command};

/// Execute a parsed command line
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        // Offline, no engine connection needed
        Command::Lun(command) => commands::lun::run(command),
        command => {
            let config = settings::load(&cli.global)?;
            let client = vmgr_client::EngineClient::new(config).await?;
            commands::run(&client, command).await
        }
    }
}
