use crate::constants::{DEFAULT_AUDIT_LOG, DEFAULT_LISTEN_PORT, DEFAULT_ROOT_DIR};
use crate::core_cli::ServerCli;
use log::{info, warn};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    #[serde(deserialize_with = "lenient_port")]
    pub listen_port: u16,
    pub root_dir: String,
    pub audit_log: String,
    pub audit_enabled: bool,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_port: DEFAULT_LISTEN_PORT,
            root_dir: String::from(DEFAULT_ROOT_DIR),
            audit_log: String::from(DEFAULT_AUDIT_LOG),
            audit_enabled: true,
            idle_timeout_secs: None,
        }
    }
}

impl Config {
    /// Loads the configuration file. A missing file is not an error: the
    /// defaults are used instead.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(
                "Configuration file {} not found, using defaults",
                path.display()
            );
            return Ok(Config::default());
        }

        let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&config_str).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(config_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(config_str)
    }

    /// Command-line flags win over the file.
    pub fn apply_cli(&mut self, cli: &ServerCli) {
        if let Some(port) = cli.port {
            self.server.listen_port = port;
        }
        if let Some(root) = &cli.root {
            self.server.root_dir = root.to_string_lossy().into_owned();
        }
        if let Some(audit_log) = &cli.audit_log {
            self.server.audit_log = audit_log.to_string_lossy().into_owned();
        }
        if cli.no_audit {
            self.server.audit_enabled = false;
        }
    }

    pub fn log_config(&self) {
        info!("  Listen Port: {}", self.server.listen_port);
        info!("  Root Directory: {}", self.server.root_dir);
        if self.server.audit_enabled {
            info!("  Audit Log: {}", self.server.audit_log);
        } else {
            info!("  Audit Log: disabled");
        }
        match self.server.idle_timeout_secs {
            Some(secs) => info!("  Idle Timeout: {} s", secs),
            None => info!("  Idle Timeout: none"),
        }
    }
}

/// Accepts the port as an integer or a numeric string. Anything unusable
/// falls back to the default port instead of failing the whole file.
fn lenient_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let value = toml::Value::deserialize(deserializer)?;
    let port = match &value {
        toml::Value::Integer(n) => u16::try_from(*n).ok(),
        toml::Value::String(s) => s.trim().parse::<u16>().ok(),
        _ => None,
    }
    .filter(|port| *port != 0);

    Ok(port.unwrap_or_else(|| {
        warn!(
            "Invalid listen_port {}, falling back to {}",
            value, DEFAULT_LISTEN_PORT
        );
        DEFAULT_LISTEN_PORT
    }))
}
