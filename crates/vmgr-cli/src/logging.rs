//! Console logging
//!
//! Logs go to stderr so stdout carries only command output.

use tracing::Level;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Level used when neither `--verbose` nor `RUST_LOG` is given
pub const DEFAULT_LEVEL: Level = Level::INFO;

/// Build the log filter: `--verbose` forces debug, otherwise `RUST_LOG`
/// is honoured with [`DEFAULT_LEVEL`] as fallback.
pub fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new(Level::DEBUG.to_string());
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL.to_string()))
}

pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_filter(filter(verbose));

    Registry::default().with(console_layer).try_init()?;
    Ok(())
}
