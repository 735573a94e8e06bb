//! Configuration module for tokencast.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by concern: Model and Storage.

mod model_config;
mod storage_config;

pub use model_config::ModelEnvConfig;
pub use storage_config::{StorageEnvConfig, StorageMode};

use anyhow::{Context, Result};
use std::env;

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    // Storage (from StorageEnvConfig)
    pub storage_mode: StorageMode,
    pub database_url: String,
    pub persist_predictions: bool,

    /// Days of history requested when analysing a token
    pub lookback_days: usize,

    // Model (from ModelEnvConfig)
    pub model: ModelEnvConfig,
}

impl Default for Config {
    fn default() -> Self {
        let storage = StorageEnvConfig::default();
        Self {
            storage_mode: storage.mode,
            database_url: storage.database_url,
            persist_predictions: storage.persist_predictions,
            lookback_days: 90,
            model: ModelEnvConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let storage = StorageEnvConfig::from_env().context("Failed to load storage config")?;
        let model = ModelEnvConfig::from_env().context("Failed to load model config")?;

        let lookback_days = env::var("LOOKBACK_DAYS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|d| *d > 0)
            .unwrap_or(90);

        // Shorter lookbacks would make every analysis fail for lack of data
        if lookback_days < model.min_history {
            anyhow::bail!(
                "LOOKBACK_DAYS ({}) must be at least MODEL_MIN_HISTORY ({})",
                lookback_days,
                model.min_history
            );
        }

        Ok(Self {
            storage_mode: storage.mode,
            database_url: storage.database_url,
            persist_predictions: storage.persist_predictions,
            lookback_days,
            model,
        })
    }
}
