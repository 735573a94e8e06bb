use crate::application::market_data::HistoricalDataProvider;
use crate::application::ml::PricePredictor;
use crate::domain::errors::PredictionError;
use crate::domain::prediction::{
    PredictionRecord, PredictionRequest, PredictionResult, Timeframe, TokenAnalysis,
};
use crate::domain::repositories::PredictionRepository;
use crate::domain::token::TokenProfile;
use anyhow::Result;
use chrono::Utc;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::info;

/// Ties the data provider to the predictor for a whole token
pub struct AnalysisService {
    provider: HistoricalDataProvider,
    predictor: PricePredictor,
    repository: Option<Arc<dyn PredictionRepository>>,
    lookback_days: usize,
}

impl AnalysisService {
    pub fn new(
        provider: HistoricalDataProvider,
        predictor: PricePredictor,
        lookback_days: usize,
    ) -> Self {
        Self {
            provider,
            predictor,
            repository: None,
            lookback_days,
        }
    }

    /// Repository used for history lookups
    pub fn with_repository(mut self, repository: Arc<dyn PredictionRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn catalogue(&self) -> &[TokenProfile] {
        self.provider.generator().catalogue().tokens()
    }

    pub async fn predict(
        &self,
        token_id: &str,
        timeframe: Timeframe,
    ) -> Result<PredictionResult, PredictionError> {
        let prices = self.provider.price_history(token_id, self.lookback_days).await;
        let request = PredictionRequest::new(token_id, prices, timeframe);
        self.predictor.predict(&request).await
    }

    /// Predict every timeframe from one shared history. Any failure fails the
    /// whole analysis.
    pub async fn analyze(&self, token_id: &str) -> Result<TokenAnalysis, PredictionError> {
        let prices = self.provider.price_history(token_id, self.lookback_days).await;
        info!(
            "Analysing {} over {} prices ({} timeframes)",
            token_id,
            prices.len(),
            Timeframe::all().len()
        );

        let requests: Vec<PredictionRequest> = Timeframe::all()
            .into_iter()
            .map(|tf| PredictionRequest::new(token_id, prices.clone(), tf))
            .collect();
        let predictions =
            try_join_all(requests.iter().map(|req| self.predictor.predict(req))).await?;

        Ok(TokenAnalysis {
            token_id: token_id.to_string(),
            predictions,
            generated_at: Utc::now(),
        })
    }

    /// Most recent stored predictions, newest first
    pub async fn history(&self, token_id: &str, limit: usize) -> Result<Vec<PredictionRecord>> {
        match &self.repository {
            Some(repository) => repository.find_by_token(token_id, limit).await,
            None => Ok(Vec::new()),
        }
    }
}
