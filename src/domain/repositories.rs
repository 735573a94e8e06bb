//! Repository Pattern Abstractions
//!
//! The prediction pipeline talks to two external collaborators:
//! - `HistoricalPriceStore`: supplies chronological price observations
//! - `PredictionRepository`: records predictions once they are computed
//!
//! # Current Implementation
//!
//! In-memory implementations live in `infrastructure::repositories` and
//! SQLite implementations in `infrastructure::persistence`.
//!
//! # Example
//!
//! ```rust,no_run
//! use tokencast::domain::repositories::HistoricalPriceStore;
//! use tokencast::infrastructure::InMemoryPriceStore;
//!
//! # async {
//! let store = InMemoryPriceStore::new();
//! store.insert("aptos", vec![14.1, 14.2, 14.28]).await;
//! let prices = store.fetch_historical_prices("aptos", 30).await;
//! # };
//! ```

use crate::domain::prediction::PredictionRecord;
use anyhow::Result;
use async_trait::async_trait;

/// Source of historical prices for a token
#[async_trait]
pub trait HistoricalPriceStore: Send + Sync {
    /// Return at most `days` of the most recent observations, oldest first
    async fn fetch_historical_prices(&self, token_id: &str, days: usize) -> Result<Vec<f64>>;
}

/// Repository for persisting and retrieving predictions
#[async_trait]
pub trait PredictionRepository: Send + Sync {
    /// Save a prediction record
    async fn save(&self, record: &PredictionRecord) -> Result<()>;

    /// Find the most recent predictions for a token, newest first
    async fn find_by_token(&self, token_id: &str, limit: usize) -> Result<Vec<PredictionRecord>>;

    /// Count stored predictions
    async fn count(&self) -> Result<usize>;
}
