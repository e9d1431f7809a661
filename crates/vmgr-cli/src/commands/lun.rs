// `vmgr lun inspect FILE`

use std::{fs, path::Path};

use anyhow::Context;
use serde::Serialize;
use validator::Validate;
use vmgr_client::{Link, LogicalUnit};

use super::print_json;
use crate::cli::LunCommand;

/// A logical unit together with the facts derived from it
#[derive(Debug, Serialize)]
pub struct LunReport {
    pub logical_unit: LogicalUnit,
    pub supports_discard: Option<bool>,
    pub discard_zeroes: Option<bool>,
    pub free: bool,
    pub usable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_domain: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk: Option<Link>,
}

impl LunReport {
    pub fn new(logical_unit: LogicalUnit) -> Self {
        Self {
            supports_discard: logical_unit.supports_discard(),
            discard_zeroes: logical_unit.discard_zeroes(),
            free: logical_unit.is_free(),
            usable: logical_unit.is_usable(),
            storage_domain: logical_unit.storage_domain_ref(),
            disk: logical_unit.disk_ref(),
            logical_unit: LogicalUnit {
                password: logical_unit.password.as_ref().map(|_| "***".to_string()),
                ..logical_unit
            },
        }
    }
}

pub fn run(command: LunCommand) -> anyhow::Result<()> {
    match command {
        LunCommand::Inspect { file } => print_json(&inspect(&file)?),
    }
}

/// Decode and validate a logical unit document (JSON, or YAML by extension)
pub fn inspect(path: &Path) -> anyhow::Result<LunReport> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let logical_unit: LogicalUnit = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yml" | "yaml") => serde_yaml::from_str(&content)
            .with_context(|| format!("{} is not a logical unit document", path.display()))?,
        _ => serde_json::from_str(&content)
            .with_context(|| format!("{} is not a logical unit document", path.display()))?,
    };
    logical_unit
        .validate()
        .with_context(|| format!("logical unit in {} is invalid", path.display()))?;

    Ok(LunReport::new(logical_unit))
}
