//! Command line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use vmgr_api::{AsyncOptions, ListOptions};

/// Manage external host providers of a virtualization engine
#[derive(Debug, Parser)]
#[command(name = "vmgr", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: Command,
}

/// Connection and output options shared by every command
#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// Configuration file, defaults to conf/vmgr.yml when present
    #[arg(short = 'c', long = "config", env = "VMGR_CONFIG", global = true)]
    pub config: Option<PathBuf>,
    /// Engine address, repeat for failover
    #[arg(short = 's', long = "server", global = true)]
    pub servers: Vec<String>,
    #[arg(short = 'u', long = "username", global = true)]
    pub username: Option<String>,
    #[arg(short = 'p', long = "password", global = true)]
    pub password: Option<String>,
    /// Accept invalid TLS certificates
    #[arg(long = "insecure", global = true)]
    pub insecure: bool,
    /// Log at debug level
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Work with the provider collection
    #[command(subcommand)]
    Providers(ProvidersCommand),
    /// Work with a single provider
    Provider {
        /// Provider identifier
        id: String,
        #[command(subcommand)]
        command: ProviderCommand,
    },
    /// Offline helpers for logical unit documents
    #[command(subcommand)]
    Lun(LunCommand),
}

#[derive(Debug, Subcommand)]
pub enum ProvidersCommand {
    /// List providers
    List(ListArgs),
    /// Register a new provider
    Add(AddArgs),
}

#[derive(Debug, Subcommand)]
pub enum ProviderCommand {
    /// Show the provider
    Get,
    /// Change provider attributes
    Update(UpdateArgs),
    /// Remove the provider
    Remove(AsyncArgs),
    /// Check that the engine can reach the provider
    TestConnectivity(AsyncArgs),
    /// List the certificates the provider presents
    Certificates,
    /// Import PEM certificates from a file
    ImportCertificates {
        file: PathBuf,
    },
    Hosts(MaxArgs),
    HostGroups(MaxArgs),
    ComputeResources(MaxArgs),
    DiscoveredHosts(MaxArgs),
    /// Show the provider with all of its sub-collections
    Inventory(MaxArgs),
}

#[derive(Debug, Subcommand)]
pub enum LunCommand {
    /// Decode, validate and describe a logical unit (JSON or YAML)
    Inspect { file: PathBuf },
}

#[derive(Debug, Default, Args)]
pub struct MaxArgs {
    /// Maximum number of items to return
    #[arg(long)]
    pub max: Option<u32>,
}

impl MaxArgs {
    pub fn list_options(&self) -> ListOptions {
        ListOptions {
            max: self.max,
            search: None,
        }
    }
}

#[derive(Debug, Default, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub max: Option<u32>,
    /// Engine search expression, e.g. `name=fore*`
    #[arg(long)]
    pub search: Option<String>,
}

impl ListArgs {
    pub fn list_options(&self) -> ListOptions {
        ListOptions {
            max: self.max,
            search: self.search.clone(),
        }
    }
}

#[derive(Debug, Default, Args)]
pub struct AsyncArgs {
    /// Ask the engine to complete in the background (`--async` or `--async=false`)
    #[arg(
        long = "async",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub asynchronous: Option<bool>,
}

impl AsyncArgs {
    pub fn options(&self) -> AsyncOptions {
        AsyncOptions {
            asynchronous: self.asynchronous,
        }
    }
}

#[derive(Debug, Default, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub url: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub comment: Option<String>,
    /// Account the engine uses against the provider
    #[arg(long = "provider-username", requires = "provider_password")]
    pub provider_username: Option<String>,
    #[arg(long = "provider-password")]
    pub provider_password: Option<String>,
    #[arg(long = "authentication-url")]
    pub authentication_url: Option<String>,
}

#[derive(Debug, Default, Args)]
pub struct UpdateArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub url: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub comment: Option<String>,
    #[command(flatten)]
    pub asynchronous: AsyncArgs,
}
