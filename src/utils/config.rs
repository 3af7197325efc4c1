use std::env;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a valid port number, got {value:?}")]
    InvalidPort { name: &'static str, value: String },

    #[error("{name} must be one of {expected}, got {value:?}")]
    UnknownBackend {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Where comments and reading history are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StorageBackend::Mongo),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(ConfigError::UnknownBackend {
                name: "STORAGE_BACKEND",
                expected: "mongo, memory",
                value: s.to_string(),
            }),
        }
    }
}

/// Where votes and bookmarks are kept.
///
/// The memory ledger is private to one process; deployments running several
/// instances must use redis so every instance sees the same tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerBackend {
    Memory,
    Redis,
}

impl FromStr for LedgerBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(LedgerBackend::Memory),
            "redis" => Ok(LedgerBackend::Redis),
            _ => Err(ConfigError::UnknownBackend {
                name: "LEDGER_BACKEND",
                expected: "memory, redis",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub mongodb_uri: String,
    pub mongodb_database: String,
    pub ledger: LedgerBackend,
    pub redis_url: String,
    /// Bearer token accepted by moderation procedures. Unset disables them.
    pub moderation_token: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port_raw = lookup("PORT").unwrap_or_else(|| "8000".to_string());
        let port = port_raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort {
            name: "PORT",
            value: port_raw.clone(),
        })?;

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            storage: lookup("STORAGE_BACKEND")
                .map(|v| v.parse::<StorageBackend>())
                .transpose()?
                .unwrap_or(StorageBackend::Mongo),
            mongodb_uri: lookup("MONGODB_URI")
                .unwrap_or_else(|| "mongodb://localhost:27017".to_string()),
            mongodb_database: lookup("MONGODB_DATABASE")
                .unwrap_or_else(|| "newsroom".to_string()),
            ledger: lookup("LEDGER_BACKEND")
                .map(|v| v.parse::<LedgerBackend>())
                .transpose()?
                .unwrap_or(LedgerBackend::Memory),
            redis_url: lookup("REDIS_URL")
                .unwrap_or_else(|| "redis://127.0.0.1:6379".to_string()),
            moderation_token: lookup("MODERATION_TOKEN").filter(|t| !t.trim().is_empty()),
        })
    }
}
