use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::config::{Config, StorageMode};
use crate::domain::repositories::{HistoricalPriceStore, PredictionRepository};
use crate::infrastructure::persistence::{
    Database, SqlitePredictionRepository, SqlitePriceHistoryStore,
};
use crate::infrastructure::repositories::{InMemoryPredictionRepository, InMemoryPriceStore};

/// Write side of the configured price store
#[derive(Clone)]
pub enum PriceWriter {
    Memory(InMemoryPriceStore),
    Sqlite(Arc<SqlitePriceHistoryStore>),
}

impl PriceWriter {
    /// Store a daily series ending today
    pub async fn save_daily(&self, token_id: &str, prices: &[f64]) -> Result<()> {
        match self {
            PriceWriter::Memory(store) => {
                store.insert(token_id, prices.to_vec()).await;
                Ok(())
            }
            PriceWriter::Sqlite(store) => {
                store.save_daily_prices(token_id, Utc::now(), prices).await
            }
        }
    }
}

pub struct PersistenceHandle {
    pub db: Option<Database>,
    pub price_store: Arc<dyn HistoricalPriceStore>,
    pub price_writer: PriceWriter,
    pub prediction_repository: Arc<dyn PredictionRepository>,
}

pub struct PersistenceBootstrap;

impl PersistenceBootstrap {
    pub async fn init(config: &Config) -> Result<PersistenceHandle> {
        match config.storage_mode {
            StorageMode::Memory => {
                info!("Using in-memory storage");
                let prices = InMemoryPriceStore::new();
                Ok(PersistenceHandle {
                    db: None,
                    price_store: Arc::new(prices.clone()),
                    price_writer: PriceWriter::Memory(prices),
                    prediction_repository: Arc::new(InMemoryPredictionRepository::new()),
                })
            }
            StorageMode::Sqlite => {
                info!("Initializing Database at {}", config.database_url);
                let db = Database::new(&config.database_url)
                    .await
                    .context("Failed to initialize database")?;

                let prices = Arc::new(SqlitePriceHistoryStore::new(db.pool.clone()));
                let predictions = Arc::new(SqlitePredictionRepository::new(db.pool.clone()));

                Ok(PersistenceHandle {
                    db: Some(db),
                    price_store: prices.clone(),
                    price_writer: PriceWriter::Sqlite(prices),
                    prediction_repository: predictions,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_writer_feeds_store() {
        let handle = PersistenceBootstrap::init(&Config::default()).await.unwrap();
        assert!(handle.db.is_none());

        handle
            .price_writer
            .save_daily("aptos", &[1.0, 2.0, 3.0])
            .await
            .unwrap();
        let prices = handle
            .price_store
            .fetch_historical_prices("aptos", 10)
            .await
            .unwrap();
        assert_eq!(prices, vec![1.0, 2.0, 3.0]);
    }

    #[tokio::test]
    async fn test_sqlite_writer_feeds_store() {
        let config = Config {
            storage_mode: StorageMode::Sqlite,
            database_url: "sqlite::memory:".to_string(),
            ..Config::default()
        };
        let handle = PersistenceBootstrap::init(&config).await.unwrap();
        assert!(handle.db.is_some());

        handle
            .price_writer
            .save_daily("bitcoin", &[5.0, 6.0])
            .await
            .unwrap();
        let prices = handle
            .price_store
            .fetch_historical_prices("bitcoin", 10)
            .await
            .unwrap();
        assert_eq!(prices, vec![5.0, 6.0]);
    }
}
