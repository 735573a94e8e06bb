//! In-Memory Repository Implementations
//!
//! Thread-safe, in-memory implementations of the traits defined in
//! `domain::repositories`, backed by `Arc<RwLock>`.
//!
//! Data is lost on restart. Use the SQLite adapters in
//! `infrastructure::persistence` to keep history between runs.

use crate::domain::prediction::PredictionRecord;
use crate::domain::repositories::{HistoricalPriceStore, PredictionRepository};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Price history keyed by token id, oldest first
#[derive(Clone, Default)]
pub struct InMemoryPriceStore {
    prices: Arc<RwLock<HashMap<String, Vec<f64>>>>,
}

impl InMemoryPriceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the series for a token
    pub async fn insert(&self, token_id: &str, prices: Vec<f64>) {
        self.prices
            .write()
            .await
            .insert(token_id.to_string(), prices);
    }

    pub async fn append(&self, token_id: &str, price: f64) {
        self.prices
            .write()
            .await
            .entry(token_id.to_string())
            .or_default()
            .push(price);
    }

    pub async fn len(&self, token_id: &str) -> usize {
        self.prices
            .read()
            .await
            .get(token_id)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl HistoricalPriceStore for InMemoryPriceStore {
    async fn fetch_historical_prices(&self, token_id: &str, days: usize) -> Result<Vec<f64>> {
        let prices = self.prices.read().await;
        let series = prices.get(token_id).map(Vec::as_slice).unwrap_or_default();
        let start = series.len().saturating_sub(days);
        Ok(series[start..].to_vec())
    }
}

/// In-memory implementation of PredictionRepository
#[derive(Clone, Default)]
pub struct InMemoryPredictionRepository {
    records: Arc<RwLock<Vec<PredictionRecord>>>,
}

impl InMemoryPredictionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PredictionRepository for InMemoryPredictionRepository {
    async fn save(&self, record: &PredictionRecord) -> Result<()> {
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn find_by_token(&self, token_id: &str, limit: usize) -> Result<Vec<PredictionRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .rev()
            .filter(|r| r.result.token_id == token_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prediction::{PredictionResult, Timeframe};
    use chrono::Utc;

    fn record(token_id: &str, timeframe: Timeframe) -> PredictionRecord {
        PredictionRecord::new(
            PredictionResult {
                token_id: token_id.to_string(),
                current_price: 10.0,
                predicted_price: 11.0,
                predicted_change: 10.0,
                confidence: 80.0,
                timeframe,
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_price_store_returns_most_recent_days() {
        let store = InMemoryPriceStore::new();
        store.insert("aptos", vec![1.0, 2.0, 3.0, 4.0]).await;
        store.append("aptos", 5.0).await;

        assert_eq!(
            store.fetch_historical_prices("aptos", 3).await.unwrap(),
            vec![3.0, 4.0, 5.0]
        );
        assert_eq!(store.fetch_historical_prices("aptos", 50).await.unwrap().len(), 5);
        assert!(store.fetch_historical_prices("other", 5).await.unwrap().is_empty());
        assert_eq!(store.len("aptos").await, 5);
    }

    #[tokio::test]
    async fn test_prediction_repository_newest_first() {
        let repo = InMemoryPredictionRepository::new();
        repo.save(&record("aptos", Timeframe::OneDay)).await.unwrap();
        repo.save(&record("bitcoin", Timeframe::OneDay)).await.unwrap();
        repo.save(&record("aptos", Timeframe::SevenDays)).await.unwrap();

        let found = repo.find_by_token("aptos", 10).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].result.timeframe, Timeframe::SevenDays);

        let limited = repo.find_by_token("aptos", 1).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[test]
    fn test_price_store_blocking_access() {
        let store = InMemoryPriceStore::new();
        tokio_test::block_on(store.insert("solana", vec![120.0, 121.0]));
        let prices = tokio_test::block_on(store.fetch_historical_prices("solana", 1)).unwrap();
        assert_eq!(prices, vec![121.0]);
    }
}
