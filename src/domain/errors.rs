use thiserror::Error;

/// Errors surfaced by a prediction call.
///
/// Store failures never appear here: the data provider absorbs them with its
/// synthetic fallback, and persistence failures are logged by the predictor.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Not enough historical data for prediction: need {required} points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Invalid price at index {index}: {value}")]
    InvalidPrice { index: usize, value: f64 },

    #[error("Model training failed: {reason}")]
    TrainingFailed { reason: String },
}

impl PredictionError {
    pub fn training(reason: impl Into<String>) -> Self {
        PredictionError::TrainingFailed {
            reason: reason.into(),
        }
    }

    /// Message shown to end users; the detailed cause goes to the log.
    pub fn user_message(&self) -> &'static str {
        "Prediction failed, please try again."
    }
}
