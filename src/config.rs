//! Configuration loading.
//!
//! Settings are read once at startup: defaults, then an optional YAML file,
//! then environment variables, then command-line overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

/// File picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "tasklist.yaml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string, e.g. `sqlite://tasklist.db` or `:memory:`.
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://tasklist.db".to_string()
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Load the explicit file if given, else [`DEFAULT_CONFIG_FILE`] when it
    /// exists, else defaults. Environment overrides are applied on top.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load(DEFAULT_CONFIG_FILE)?,
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply `DATABASE_URL`, `PORT` and `HOST` overrides.
    ///
    /// `lookup` abstracts the environment so tests do not have to mutate it.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            self.database.url = url;
        }

        if let Some(port) = lookup("PORT") {
            match port.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid PORT"),
            }
        }

        if let Some(host) = lookup("HOST").filter(|v| !v.trim().is_empty()) {
            self.server.host = host;
        }
    }

    /// Socket address to bind.
    ///
    /// `host` may be an IPv4 or IPv6 literal or a name; names are resolved
    /// and the first address wins.
    pub async fn listen_addr(&self) -> Result<SocketAddr> {
        let host = self.server.host.trim();
        let port = self.server.port;

        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, port));
        }

        tokio::net::lookup_host((host, port))
            .await
            .with_context(|| format!("Failed to resolve listen host {}", host))?
            .next()
            .with_context(|| format!("Listen host {} has no addresses", host))
    }
}
