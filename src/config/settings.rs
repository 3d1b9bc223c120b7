//! Settings structures for todos-rs configuration

use crate::search::DEFAULT_CHANNEL_CAPACITY;
use crate::storage::RetryPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Main settings structure, loaded from `settings.yml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub search: SearchSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Merge with environment variables (TODOS_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    /// Merge from an arbitrary variable source
    pub fn merge_vars<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("TODOS_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = var("TODOS_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("TODOS_DSN") {
            self.storage.dsn = Some(val);
        }
        if let Some(val) = var("TODOS_LOG_LEVEL") {
            self.logging.level = val;
        }
    }

    /// Override the listen address with a `host:port` value
    pub fn set_http_addr(&mut self, addr: &str) -> Result<()> {
        let addr: SocketAddr = addr
            .parse()
            .with_context(|| format!("invalid HTTP address: {addr}"))?;
        self.server.bind_address = addr.ip().to_string();
        self.server.port = addr.port();
        Ok(())
    }

    /// Socket address to listen on
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip = self
            .server
            .bind_address
            .parse()
            .with_context(|| format!("invalid bind address: {}", self.server.bind_address))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Bind address
    pub bind_address: String,
    /// Server port
    pub port: u16,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 60,
        }
    }
}

impl ServerSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Storage backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// SQLite database: a file path or `:memory:`. Unset or empty keeps todos in memory.
    pub dsn: Option<String>,
    /// Connection attempts before falling back to memory
    pub connect_attempts: u32,
    /// Delay after the first failed attempt
    pub connect_initial_delay_ms: u64,
    /// Upper bound for the delay between attempts
    pub connect_max_delay_ms: u64,
}

impl Default for StorageSettings {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            dsn: None,
            connect_attempts: policy.attempts,
            connect_initial_delay_ms: policy.initial_delay.as_millis() as u64,
            connect_max_delay_ms: policy.max_delay.as_millis() as u64,
        }
    }
}

impl StorageSettings {
    /// The configured DSN, if it names a database
    pub fn dsn(&self) -> Option<&str> {
        self.dsn
            .as_deref()
            .map(str::trim)
            .filter(|dsn| !dsn.is_empty())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.connect_attempts,
            initial_delay: Duration::from_millis(self.connect_initial_delay_ms),
            max_delay: Duration::from_millis(self.connect_max_delay_ms),
        }
    }
}

/// Tag search settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Capacity of the channel between tag lookups and the aggregator
    pub channel_capacity: usize,
    /// Deadline for a whole tag search, in milliseconds
    pub timeout_ms: Option<u64>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            timeout_ms: None,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
