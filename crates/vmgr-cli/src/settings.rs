//! Layered client settings
//!
//! Sources, lowest precedence first: the YAML configuration file, `VMGR_`
//! prefixed environment variables, then command line flags.

use std::path::Path;

use anyhow::Context;
use config::{Config, Environment, File, FileFormat, Map};
use vmgr_client::ClientConfig;

use crate::cli::GlobalArgs;

pub const DEFAULT_CONFIG_FILE: &str = "conf/vmgr.yml";
pub const ENV_PREFIX: &str = "VMGR";

/// Load the client configuration from file, process environment and flags
pub fn load(args: &GlobalArgs) -> anyhow::Result<ClientConfig> {
    load_with_env(args, None)
}

/// Same as [`load`], reading environment variables from `env` when given
pub fn load_with_env(
    args: &GlobalArgs,
    env: Option<Map<String, String>>,
) -> anyhow::Result<ClientConfig> {
    // An explicit file must exist, the default one is optional
    let (path, required) = match &args.config {
        Some(path) => (path.as_path(), true),
        None => (Path::new(DEFAULT_CONFIG_FILE), false),
    };
    let path_str = path
        .to_str()
        .with_context(|| format!("configuration path {} is not valid UTF-8", path.display()))?;

    let mut builder = Config::builder()
        .add_source(File::new(path_str, FileFormat::Yaml).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("server_addrs")
                .source(env),
        );

    if !args.servers.is_empty() {
        builder = builder.set_override("server_addrs", args.servers.clone())?;
    }
    builder = builder
        .set_override_option("username", args.username.clone())?
        .set_override_option("password", args.password.clone())?;
    if args.insecure {
        builder = builder.set_override("insecure", true)?;
    }

    let config: ClientConfig = builder
        .build()
        .with_context(|| format!("failed to load configuration from {}", path.display()))?
        .try_deserialize()
        .context("invalid client configuration")?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn args_with_file(file: &tempfile::NamedTempFile) -> GlobalArgs {
        GlobalArgs {
            config: Some(file.path().to_path_buf()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_without_sources() {
        let args = GlobalArgs {
            config: None,
            ..Default::default()
        };
        let config = load_with_env(&args, Some(Map::new())).unwrap();
        let defaults = ClientConfig::default();

        assert_eq!(config.context_path, defaults.context_path);
        assert_eq!(config.connect_timeout_ms, defaults.connect_timeout_ms);
        assert!(!config.has_credentials());
    }

    #[test]
    fn test_file_values() {
        let file = write_config(
            r#"
server_addrs:
  - https://engine-a.example.com
  - https://engine-b.example.com
username: admin@internal
password: secret
read_timeout_ms: 60000
"#,
        );
        let config = load_with_env(&args_with_file(&file), Some(Map::new())).unwrap();

        assert_eq!(config.server_addrs.len(), 2);
        assert_eq!(config.username, "admin@internal");
        assert_eq!(config.read_timeout_ms, 60000);
        assert!(config.has_credentials());
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = write_config("username: from-file\nconnect_timeout_ms: 100\n");
        let mut env = Map::new();
        env.insert("VMGR_USERNAME".to_string(), "from-env".to_string());
        env.insert("VMGR_CONNECT_TIMEOUT_MS".to_string(), "2500".to_string());
        env.insert(
            "VMGR_SERVER_ADDRS".to_string(),
            "https://a.example.com,https://b.example.com".to_string(),
        );

        let config = load_with_env(&args_with_file(&file), Some(env)).unwrap();

        assert_eq!(config.username, "from-env");
        assert_eq!(config.connect_timeout_ms, 2500);
        assert_eq!(
            config.server_addrs,
            vec!["https://a.example.com", "https://b.example.com"]
        );
    }

    #[test]
    fn test_flags_override_environment() {
        let file = write_config("insecure: false\n");
        let mut env = Map::new();
        env.insert("VMGR_USERNAME".to_string(), "from-env".to_string());

        let args = GlobalArgs {
            servers: vec!["https://flag.example.com".to_string()],
            username: Some("from-flag".to_string()),
            insecure: true,
            ..args_with_file(&file)
        };
        let config = load_with_env(&args, Some(env)).unwrap();

        assert_eq!(config.server_addrs, vec!["https://flag.example.com"]);
        assert_eq!(config.username, "from-flag");
        assert!(config.insecure);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let args = GlobalArgs {
            config: Some("/nonexistent/vmgr.yml".into()),
            ..Default::default()
        };
        assert!(load_with_env(&args, Some(Map::new())).is_err());
    }
}
