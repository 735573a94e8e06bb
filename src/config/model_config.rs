//! Model hyperparameters parsed from environment variables.

use anyhow::Result;
use std::env;

/// Sequence-model environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEnvConfig {
    pub window_size: usize,
    pub hidden_units: usize,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub min_history: usize,
    pub seed: Option<u64>,
}

impl Default for ModelEnvConfig {
    fn default() -> Self {
        Self {
            window_size: 5,
            hidden_units: 50,
            epochs: 25,
            batch_size: 32,
            learning_rate: 0.01,
            min_history: 10,
            seed: None,
        }
    }
}

impl ModelEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let window_size = positive_var("MODEL_WINDOW_SIZE").unwrap_or(defaults.window_size);
        let hidden_units = positive_var("MODEL_HIDDEN_UNITS").unwrap_or(defaults.hidden_units);
        let epochs = positive_var("MODEL_EPOCHS").unwrap_or(defaults.epochs);
        let batch_size = positive_var("MODEL_BATCH_SIZE").unwrap_or(defaults.batch_size);

        let learning_rate = env::var("MODEL_LEARNING_RATE")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|lr| lr.is_finite() && *lr > 0.0)
            .unwrap_or(defaults.learning_rate);

        let min_history = positive_var("MODEL_MIN_HISTORY").unwrap_or(defaults.min_history);

        let seed = env::var("MODEL_SEED")
            .ok()
            .and_then(|v| v.parse::<u64>().ok());

        // Every accepted series must produce at least one training window
        if min_history <= window_size {
            anyhow::bail!(
                "MODEL_MIN_HISTORY ({}) must be greater than MODEL_WINDOW_SIZE ({})",
                min_history,
                window_size
            );
        }

        Ok(Self {
            window_size,
            hidden_units,
            epochs,
            batch_size,
            learning_rate,
            min_history,
            seed,
        })
    }
}

fn positive_var(key: &str) -> Option<usize> {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v > 0)
}
