use std::sync::Arc;
use tracing::info;

use crate::application::analysis::AnalysisService;
use crate::application::bootstrap::persistence::PersistenceHandle;
use crate::application::market_data::{HistoricalDataProvider, SyntheticSeriesGenerator};
use crate::application::ml::{LstmTrainer, ModelTrainer, PricePredictor, TrainerConfig};
use crate::config::Config;
use crate::domain::token::TokenCatalogue;

pub struct ServicesHandle {
    pub trainer: Arc<LstmTrainer>,
    pub generator: SyntheticSeriesGenerator,
    pub analysis: Arc<AnalysisService>,
}

pub struct ServicesBootstrap;

impl ServicesBootstrap {
    pub fn init(config: &Config, persistence: &PersistenceHandle) -> ServicesHandle {
        let trainer = Arc::new(LstmTrainer::new(TrainerConfig::from(&config.model)));
        info!(
            "Model: {} (window {}, hidden {}, {} epochs)",
            trainer.name(),
            config.model.window_size,
            config.model.hidden_units,
            config.model.epochs
        );

        let generator = SyntheticSeriesGenerator::new(TokenCatalogue::default());
        let provider = HistoricalDataProvider::new(
            persistence.price_store.clone(),
            generator.clone(),
            config.model.min_history,
        );

        let mut predictor = PricePredictor::new(trainer.clone(), &config.model);
        if config.persist_predictions {
            predictor = predictor.with_repository(persistence.prediction_repository.clone());
        }

        let analysis = AnalysisService::new(provider, predictor, config.lookback_days)
            .with_repository(persistence.prediction_repository.clone());

        ServicesHandle {
            trainer,
            generator,
            analysis: Arc::new(analysis),
        }
    }
}
