use super::lstm::LstmNetwork;
use crate::config::ModelEnvConfig;
use crate::domain::errors::PredictionError;
use crate::domain::ml::TrainingSet;
use candle_nn::{AdamW, Optimizer, ParamsAdamW};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// Interface for fitting a sequence model on a windowed series
pub trait ModelTrainer: Send + Sync {
    /// Build and fit a fresh model. The caller owns the returned model and
    /// its weights are released when it is dropped.
    fn train(&self, set: &TrainingSet) -> Result<TrainedModel, PredictionError>;

    /// Get trainer name/type
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainerConfig {
    pub hidden_units: usize,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self::from(&ModelEnvConfig::default())
    }
}

impl From<&ModelEnvConfig> for TrainerConfig {
    fn from(config: &ModelEnvConfig) -> Self {
        Self {
            hidden_units: config.hidden_units,
            epochs: config.epochs,
            batch_size: config.batch_size,
            learning_rate: config.learning_rate,
            seed: config.seed,
        }
    }
}

fn candle_failure(e: candle_core::Error) -> PredictionError {
    PredictionError::training(e.to_string())
}

/// Mean training loss per epoch
#[derive(Debug, Clone, Default)]
pub struct TrainingHistory {
    pub loss: Vec<f64>,
}

impl TrainingHistory {
    pub fn final_loss(&self) -> Option<f64> {
        self.loss.last().copied()
    }
}

/// Keeps a trainer's live-model count accurate for as long as a model exists
struct ModelLease {
    live: Arc<AtomicUsize>,
}

impl ModelLease {
    fn acquire(live: &Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self { live: live.clone() }
    }
}

impl Drop for ModelLease {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A fitted model, valid for a single prediction
pub struct TrainedModel {
    network: LstmNetwork,
    history: TrainingHistory,
    _lease: Option<ModelLease>,
}

impl TrainedModel {
    pub fn new(network: LstmNetwork, history: TrainingHistory) -> Self {
        Self {
            network,
            history,
            _lease: None,
        }
    }

    /// Forward pass over an already-normalized window
    pub fn predict(&self, window: &[f64]) -> Result<f64, PredictionError> {
        self.network.predict(window).map_err(candle_failure)
    }

    pub fn history(&self) -> &TrainingHistory {
        &self.history
    }

    pub fn network(&self) -> &LstmNetwork {
        &self.network
    }
}

/// Fits a single-layer LSTM with MSE loss and Adam
pub struct LstmTrainer {
    config: TrainerConfig,
    live_models: Arc<AtomicUsize>,
}

impl LstmTrainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self {
            config,
            live_models: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of models trained by this instance that are still alive
    pub fn live_models(&self) -> usize {
        self.live_models.load(Ordering::SeqCst)
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }
}

impl Default for LstmTrainer {
    fn default() -> Self {
        Self::new(TrainerConfig::default())
    }
}

impl ModelTrainer for LstmTrainer {
    fn train(&self, set: &TrainingSet) -> Result<TrainedModel, PredictionError> {
        if set.is_empty() {
            return Err(PredictionError::training("no training windows"));
        }
        if self.config.batch_size == 0 || self.config.hidden_units == 0 {
            return Err(PredictionError::training(
                "batch size and hidden units must be positive",
            ));
        }

        let lease = ModelLease::acquire(&self.live_models);
        let mut rng = self.rng();
        let network =
            LstmNetwork::new(self.config.hidden_units, &mut rng).map_err(candle_failure)?;

        let params = ParamsAdamW {
            lr: self.config.learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-7,
            weight_decay: 0.0,
        };
        let mut optimizer = AdamW::new(network.vars(), params).map_err(candle_failure)?;

        info!(
            "Training model on {} windows ({} epochs, {} parameters)...",
            set.len(),
            self.config.epochs,
            network.parameter_count()
        );

        let mut indices: Vec<usize> = (0..set.len()).collect();
        let mut history = TrainingHistory::default();

        for epoch in 0..self.config.epochs {
            indices.shuffle(&mut rng);
            let mut epoch_loss = 0.0;

            for batch in indices.chunks(self.config.batch_size) {
                let inputs = network
                    .batch(
                        batch.iter().map(|&i| set.windows[i].as_slice()),
                        set.window_size,
                    )
                    .map_err(candle_failure)?;
                let targets: Vec<f64> = batch.iter().map(|&i| set.targets[i]).collect();
                let targets = network.targets(&targets).map_err(candle_failure)?;

                let loss = network.loss(&inputs, &targets).map_err(candle_failure)?;
                optimizer.backward_step(&loss).map_err(candle_failure)?;
                epoch_loss += loss.to_scalar::<f32>().map_err(candle_failure)? as f64
                    * batch.len() as f64;
            }

            let mean_loss = epoch_loss / set.len() as f64;
            if !mean_loss.is_finite() {
                return Err(PredictionError::training(format!(
                    "loss diverged at epoch {}",
                    epoch + 1
                )));
            }
            debug!("Epoch {}/{}: loss {:.6}", epoch + 1, self.config.epochs, mean_loss);
            history.loss.push(mean_loss);
        }

        info!(
            "Model training complete (final loss {:.6})",
            history.final_loss().unwrap_or_default()
        );

        Ok(TrainedModel {
            network,
            history,
            _lease: Some(lease),
        })
    }

    fn name(&self) -> &str {
        "LSTM (single layer)"
    }
}
