//! Client configuration.
//!
//! Configuration can be loaded from:
//! - Environment variables (ARENA_HOST, ARENA_IDENTITY)
//! - TOML configuration file
//! - An explicit path given as the first argument

use anyhow::{Context, Result};
use arena_core::Endpoint;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Game server authority, e.g. `pong.example:8443`.
    #[serde(default = "default_host")]
    pub host: String,

    /// Use `wss`/`https`.
    #[serde(default = "default_true")]
    pub secure: bool,

    /// Path of the game socket.
    #[serde(default = "default_game_path")]
    pub game_path: String,

    /// Path of the JSON identity file.
    #[serde(default = "default_identity")]
    pub identity: String,

    /// User directory configuration.
    #[serde(default)]
    pub users: UsersConfig,

    /// Metrics configuration.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// User directory configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsersConfig {
    /// Origin of the REST API; defaults to the game server's origin.
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable the Prometheus exporter.
    #[serde(default)]
    pub enabled: bool,

    /// Exporter port.
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

fn default_host() -> String {
    std::env::var("ARENA_HOST").unwrap_or_else(|_| "localhost:8443".to_string())
}

fn default_true() -> bool {
    true
}

fn default_game_path() -> String {
    "/game".to_string()
}

fn default_identity() -> String {
    std::env::var("ARENA_IDENTITY").unwrap_or_else(|_| "~/.config/arena/user.json".to_string())
}

fn default_metrics_port() -> u16 {
    9090
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            secure: true,
            game_path: default_game_path(),
            identity: default_identity(),
            users: UsersConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed, or if
    /// an explicit path cannot be read.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(shellexpand::tilde(path).as_ref());
        }

        let config_paths = [
            "arena.toml",
            "~/.config/arena/arena.toml",
            "/etc/arena/arena.toml",
        ];

        for path in &config_paths {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                return Self::from_file(expanded.as_ref());
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// The game server endpoint.
    #[must_use]
    pub fn endpoint(&self) -> Endpoint {
        Endpoint {
            host: self.host.clone(),
            secure: self.secure,
            path: self.game_path.clone(),
        }
    }

    /// Identity file path with `~` expanded.
    #[must_use]
    pub fn identity_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.identity).as_ref())
    }

    /// Origin profile lookups are sent to.
    #[must_use]
    pub fn users_origin(&self) -> String {
        match &self.users.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => self.endpoint().http_origin(),
        }
    }
}
