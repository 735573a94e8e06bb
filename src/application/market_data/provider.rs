use super::synthetic::SyntheticSeriesGenerator;
use crate::domain::repositories::HistoricalPriceStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Supplies price history, substituting a synthetic walk whenever the store
/// cannot provide enough points. The fallback is normal operation, not an
/// error.
pub struct HistoricalDataProvider {
    store: Arc<dyn HistoricalPriceStore>,
    generator: SyntheticSeriesGenerator,
    min_points: usize,
}

impl HistoricalDataProvider {
    pub fn new(
        store: Arc<dyn HistoricalPriceStore>,
        generator: SyntheticSeriesGenerator,
        min_points: usize,
    ) -> Self {
        Self {
            store,
            generator,
            min_points,
        }
    }

    pub fn generator(&self) -> &SyntheticSeriesGenerator {
        &self.generator
    }

    /// Chronological prices for `token_id`, never failing
    pub async fn price_history(&self, token_id: &str, days: usize) -> Vec<f64> {
        match self.store.fetch_historical_prices(token_id, days).await {
            Ok(prices) if prices.len() >= self.min_points => {
                debug!("Loaded {} stored prices for {}", prices.len(), token_id);
                prices
            }
            Ok(prices) => {
                warn!(
                    "Only {} stored prices for {} (need {}), using synthetic history",
                    prices.len(),
                    token_id,
                    self.min_points
                );
                self.generator.generate(token_id, days)
            }
            Err(e) => {
                warn!(
                    "Price history lookup failed for {}: {:#}. Using synthetic history",
                    token_id, e
                );
                self.generator.generate(token_id, days)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mock::MockHistoricalPriceStore;
    use crate::infrastructure::repositories::InMemoryPriceStore;

    fn provider(store: Arc<dyn HistoricalPriceStore>) -> HistoricalDataProvider {
        HistoricalDataProvider::new(store, SyntheticSeriesGenerator::default(), 10)
    }

    #[tokio::test]
    async fn test_stored_history_is_returned() {
        let store = Arc::new(InMemoryPriceStore::new());
        let stored: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        store.insert("aptos", stored.clone()).await;

        let prices = provider(store).price_history("aptos", 20).await;
        assert_eq!(prices, stored);
    }

    #[tokio::test]
    async fn test_empty_store_falls_back_to_requested_length() {
        let prices = provider(Arc::new(MockHistoricalPriceStore::empty()))
            .price_history("unknown-token", 30)
            .await;
        assert_eq!(prices.len(), 30);
        assert_eq!(prices[0], 100.0);
    }

    #[tokio::test]
    async fn test_short_history_falls_back() {
        let store = Arc::new(InMemoryPriceStore::new());
        store.insert("aptos", vec![14.0, 14.1, 14.2]).await;

        let prices = provider(store).price_history("aptos", 15).await;
        assert_eq!(prices.len(), 15);
        assert_eq!(prices[0], 14.28);
    }

    #[tokio::test]
    async fn test_failing_store_falls_back() {
        let prices = provider(Arc::new(MockHistoricalPriceStore::failing()))
            .price_history("ethereum", 12)
            .await;
        assert_eq!(prices.len(), 12);
        assert!(prices.iter().all(|p| *p > 0.0));
    }
}
