//! Application configuration
//!
//! Defaults, overridden by an optional JSON config file, overridden by
//! environment/CLI (clap reads the env vars, so both arrive through
//! `CliConfig`).

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::cli::CliConfig;
use super::constants::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TOKEN_TTL_MINUTES};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Access token lifetime in minutes
    pub token_ttl_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    /// Data directory override from the config file
    pub data_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration: file (if given), then CLI/env overrides
    pub fn load(cli: &CliConfig) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                serde_json::from_str::<AppConfig>(&raw)
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))?
            }
            None => AppConfig::default(),
        };

        if let Some(host) = &cli.host {
            config.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            config.server.port = port;
        }
        if let Some(ttl) = cli.token_ttl_minutes {
            config.auth.token_ttl_minutes = ttl;
        }
        if let Some(data_dir) = &cli.data_dir {
            config.data_dir = Some(data_dir.clone());
        }

        if config.auth.token_ttl_minutes <= 0 {
            anyhow::bail!("Token TTL must be positive");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::load(&CliConfig::default()).unwrap();
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.auth.token_ttl_minutes, DEFAULT_TOKEN_TTL_MINUTES);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = CliConfig {
            host: Some("0.0.0.0".to_string()),
            port: Some(9000),
            token_ttl_minutes: Some(15),
            ..Default::default()
        };
        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.auth.token_ttl_minutes, 15);
    }

    #[test]
    fn test_invalid_ttl_rejected() {
        let cli = CliConfig {
            token_ttl_minutes: Some(0),
            ..Default::default()
        };
        assert!(AppConfig::load(&cli).is_err());
    }

    #[test]
    fn test_config_file_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bodega.json");
        fs::write(
            &path,
            r#"{"server": {"port": 9100}, "auth": {"token_ttl_minutes": 30}}"#,
        )
        .unwrap();

        let cli = CliConfig {
            config: Some(path),
            ..Default::default()
        };
        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.auth.token_ttl_minutes, 30);
    }
}
