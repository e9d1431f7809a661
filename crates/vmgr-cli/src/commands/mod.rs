//! Subcommand implementations

pub mod lun;
pub mod provider;
pub mod providers;

use serde::Serialize;
use vmgr_client::EngineClient;

use crate::cli::Command;

pub async fn run(client: &EngineClient, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Providers(command) => providers::run(client, command).await,
        Command::Provider { id, command } => provider::run(client, &id, command).await,
        Command::Lun(command) => lun::run(command),
    }
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let output = serde_json::to_string_pretty(value)?;
    println!("{output}");
    Ok(())
}
