use crate::domain::prediction::PredictionRecord;
use crate::domain::repositories::{HistoricalPriceStore, PredictionRepository};
use anyhow::{Result, bail};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Price store with no data, optionally failing every lookup
pub struct MockHistoricalPriceStore {
    fail: bool,
    calls: AtomicUsize,
}

impl MockHistoricalPriceStore {
    pub fn empty() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockHistoricalPriceStore {
    fn default() -> Self {
        Self::empty()
    }
}

#[async_trait]
impl HistoricalPriceStore for MockHistoricalPriceStore {
    async fn fetch_historical_prices(&self, token_id: &str, _days: usize) -> Result<Vec<f64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            bail!("mock price store unavailable for {}", token_id);
        }
        Ok(Vec::new())
    }
}

/// Prediction repository that drops everything, or rejects every save
#[derive(Default)]
pub struct NullPredictionRepository {
    fail: bool,
    attempts: AtomicUsize,
}

impl NullPredictionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            attempts: AtomicUsize::new(0),
        }
    }

    /// Number of `save` calls received
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PredictionRepository for NullPredictionRepository {
    async fn save(&self, record: &PredictionRecord) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            bail!("prediction store rejected record {}", record.id);
        }
        Ok(())
    }

    async fn find_by_token(&self, _token_id: &str, _limit: usize) -> Result<Vec<PredictionRecord>> {
        Ok(Vec::new())
    }

    async fn count(&self) -> Result<usize> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prediction::{PredictionResult, Timeframe};
    use chrono::Utc;

    #[tokio::test]
    async fn test_mock_store_modes() {
        let empty = MockHistoricalPriceStore::empty();
        assert!(empty.fetch_historical_prices("aptos", 10).await.unwrap().is_empty());

        let failing = MockHistoricalPriceStore::failing();
        assert!(failing.fetch_historical_prices("aptos", 10).await.is_err());
        assert_eq!(failing.calls(), 1);
    }

    #[tokio::test]
    async fn test_failing_repository_counts_attempts() {
        let repo = NullPredictionRepository::failing();
        let record = PredictionRecord::new(
            PredictionResult {
                token_id: "aptos".to_string(),
                current_price: 1.0,
                predicted_price: 1.1,
                predicted_change: 10.0,
                confidence: 80.0,
                timeframe: Timeframe::OneDay,
            },
            Utc::now(),
        );

        assert!(repo.save(&record).await.is_err());
        assert_eq!(repo.attempts(), 1);
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
