use std::{fs::read_to_string, path::Path, time::Duration};

use anyhow::{anyhow, Context};
use serde::Deserialize;

use crate::mcp::ServerInfo;

/// Server configuration, read from an optional YAML file. Every key has a default.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server_name: String,
    pub server_version: String,
    pub user_agent: String,
    /// Deadline for a single HTTP request. Unset leaves the HTTP client's own behavior.
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_name: "ArcgisOnline Tools MCP Server".to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            user_agent: "feature-edit-gateway".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl Config {
    pub fn load(filepath: Option<&Path>) -> anyhow::Result<Self> {
        let filepath = match filepath {
            Some(filepath) => filepath,
            None => return Ok(Self::default()),
        };
        if !filepath.exists() {
            return Err(anyhow!("Config file {:?} not found", filepath));
        }
        let contents = read_to_string(filepath)
            .with_context(|| format!("Reading config file {:?}", filepath))?;
        Self::from_yaml(&contents).with_context(|| format!("Parsing config file {:?}", filepath))
    }

    pub fn from_yaml(contents: &str) -> anyhow::Result<Self> {
        // An empty document deserializes to unit, not to an empty mapping.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn server_info(&self) -> ServerInfo {
        ServerInfo {
            name: self.server_name.clone(),
            version: self.server_version.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, time::Duration};

    use testdir::testdir;

    use super::Config;

    #[test]
    fn test_defaults_without_file() {
        let config = Config::load(None).unwrap();
        assert_eq!(Config::default(), config);
        assert_eq!(None, config.request_timeout());
    }

    #[test]
    fn test_load_from_file() {
        let test_dir = testdir!();
        let config_filepath = test_dir.join("config.yaml");
        fs::write(
            &config_filepath,
            "server_name: Field Assets\nrequest_timeout_secs: 45\n",
        )
        .unwrap();

        let config = Config::load(Some(&config_filepath)).unwrap();
        assert_eq!("Field Assets", config.server_name);
        assert_eq!("feature-edit-gateway", config.user_agent);
        assert_eq!(Some(Duration::from_secs(45)), config.request_timeout());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let test_dir = testdir!();
        assert!(Config::load(Some(&test_dir.join("absent.yaml"))).is_err());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(Config::from_yaml("api_key: abc\n").is_err());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        assert_eq!(Config::default(), Config::from_yaml("\n").unwrap());
    }
}
