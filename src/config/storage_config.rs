//! Storage configuration parsing from environment variables.

use anyhow::Result;
use std::env;
use std::str::FromStr;

/// Backing store for price history and predictions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Memory,
    Sqlite,
}

impl FromStr for StorageMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "mock" => Ok(StorageMode::Memory),
            "sqlite" => Ok(StorageMode::Sqlite),
            _ => anyhow::bail!(
                "Invalid STORAGE_MODE: {}. Must be 'memory' or 'sqlite'",
                s
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageEnvConfig {
    pub mode: StorageMode,
    pub database_url: String,
    pub persist_predictions: bool,
}

impl Default for StorageEnvConfig {
    fn default() -> Self {
        Self {
            mode: StorageMode::Memory,
            database_url: "sqlite://data/tokencast.db".to_string(),
            persist_predictions: true,
        }
    }
}

impl StorageEnvConfig {
    pub fn from_env() -> Result<Self> {
        let mode_str = env::var("STORAGE_MODE").unwrap_or_else(|_| "memory".to_string());
        let mode = StorageMode::from_str(&mode_str)?;

        Ok(Self {
            mode,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://data/tokencast.db".to_string()),
            persist_predictions: env::var("PERSIST_PREDICTIONS")
                .unwrap_or_else(|_| "true".to_string())
                .parse::<bool>()
                .unwrap_or(true),
        })
    }
}
