use std::sync::Arc;
use tokencast::application::market_data::{HistoricalDataProvider, SyntheticSeriesGenerator};
use tokencast::application::ml::{LstmTrainer, PricePredictor, TrainerConfig};
use tokencast::config::ModelEnvConfig;
use tokencast::domain::errors::PredictionError;
use tokencast::domain::prediction::{PredictionRequest, Timeframe};
use tokencast::domain::repositories::PredictionRepository;
use tokencast::infrastructure::InMemoryPredictionRepository;
use tokencast::infrastructure::mock::{MockHistoricalPriceStore, NullPredictionRepository};

fn reference_prices() -> Vec<f64> {
    vec![100.0, 101.0, 99.0, 102.0, 103.0, 98.0, 97.0, 99.0, 104.0, 105.0]
}

/// Test: full-size model on the reference series
#[tokio::test]
async fn test_reference_series_seven_days() {
    let config = ModelEnvConfig::default();
    let trainer = Arc::new(LstmTrainer::new(TrainerConfig::from(&config)));
    let predictor = PricePredictor::new(trainer.clone(), &config);

    let request = PredictionRequest::new("aptos", reference_prices(), Timeframe::SevenDays);
    let result = predictor.predict(&request).await.unwrap();

    assert_eq!(result.current_price, 105.0);
    assert!(result.predicted_price.is_finite());
    let expected = (result.predicted_price - result.current_price) / result.current_price * 100.0;
    assert!((result.predicted_change - expected).abs() <= 1e-6 * expected.abs().max(1e-12));
    assert!((75.0..90.0).contains(&result.confidence));
    assert_eq!(result.timeframe, Timeframe::SevenDays);
    assert_eq!(trainer.live_models(), 0);
}

/// Test: a flat series predicts its own value
#[tokio::test]
async fn test_constant_series() {
    let config = ModelEnvConfig::default();
    let predictor = PricePredictor::new(
        Arc::new(LstmTrainer::new(TrainerConfig::from(&config))),
        &config,
    );

    let request = PredictionRequest::new("stable", vec![1.0; 15], Timeframe::OneDay);
    let result = predictor.predict(&request).await.unwrap();

    assert_eq!(result.predicted_price, 1.0);
    assert_eq!(result.predicted_change, 0.0);
}

/// Test: nine points are rejected before any model is built
#[tokio::test]
async fn test_short_series_is_rejected() {
    let config = ModelEnvConfig::default();
    let trainer = Arc::new(LstmTrainer::new(TrainerConfig::from(&config)));
    let predictor = PricePredictor::new(trainer.clone(), &config);

    let mut prices = reference_prices();
    prices.pop();
    let request = PredictionRequest::new("aptos", prices, Timeframe::ThirtyDays);

    match predictor.predict(&request).await {
        Err(PredictionError::InsufficientData { required, actual }) => {
            assert_eq!(required, 10);
            assert_eq!(actual, 9);
        }
        other => panic!("expected InsufficientData, got {:?}", other),
    }
    assert_eq!(trainer.live_models(), 0);
}

/// Test: a failing prediction store never hides the result
#[tokio::test]
async fn test_persistence_failure_is_swallowed() {
    let config = ModelEnvConfig::default();
    let repository = Arc::new(NullPredictionRepository::failing());
    let predictor = PricePredictor::new(
        Arc::new(LstmTrainer::new(TrainerConfig::from(&config))),
        &config,
    )
    .with_repository(repository.clone());

    let request = PredictionRequest::new("aptos", reference_prices(), Timeframe::OneDay);
    let result = predictor.predict(&request).await.unwrap();

    assert_eq!(result.current_price, 105.0);
    assert_eq!(repository.attempts(), 1);
}

/// Test: unknown token with no stored history still gets a prediction
#[tokio::test]
async fn test_unknown_token_uses_synthetic_history() {
    let config = ModelEnvConfig::default();
    let store = Arc::new(MockHistoricalPriceStore::empty());
    let provider = HistoricalDataProvider::new(
        store.clone(),
        SyntheticSeriesGenerator::default(),
        config.min_history,
    );

    let prices = provider.price_history("unknown-token", 30).await;
    assert_eq!(prices.len(), 30);
    assert_eq!(store.calls(), 1);

    let repository = Arc::new(InMemoryPredictionRepository::new());
    let predictor = PricePredictor::new(
        Arc::new(LstmTrainer::new(TrainerConfig::from(&config))),
        &config,
    )
    .with_repository(repository.clone());

    let request = PredictionRequest::new("unknown-token", prices.clone(), Timeframe::SevenDays);
    let result = predictor.predict(&request).await.unwrap();

    assert_eq!(result.current_price, prices[29]);
    assert!(result.predicted_price.is_finite());
    assert_eq!(repository.count().await.unwrap(), 1);
}

/// Test: concurrent calls for one token stay independent
#[tokio::test]
async fn test_concurrent_predictions_share_nothing() {
    let config = ModelEnvConfig::default();
    let trainer = Arc::new(LstmTrainer::new(TrainerConfig {
        hidden_units: 8,
        epochs: 5,
        ..TrainerConfig::from(&config)
    }));
    let predictor = Arc::new(PricePredictor::new(trainer.clone(), &config));

    let mut handles = Vec::new();
    for tf in Timeframe::all() {
        let predictor = predictor.clone();
        handles.push(tokio::spawn(async move {
            let request = PredictionRequest::new("aptos", reference_prices(), tf);
            predictor.predict(&request).await
        }));
    }

    for handle in handles {
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result.current_price, 105.0);
    }
    assert_eq!(trainer.live_models(), 0);
}
