use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Nominal horizon of a prediction. Carried through as metadata only; it does
/// not change the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "30d")]
    ThirtyDays,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::OneDay => "1d",
            Timeframe::SevenDays => "7d",
            Timeframe::ThirtyDays => "30d",
        }
    }

    /// All timeframes in ascending order
    pub fn all() -> [Timeframe; 3] {
        [Timeframe::OneDay, Timeframe::SevenDays, Timeframe::ThirtyDays]
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1d" => Ok(Timeframe::OneDay),
            "7d" => Ok(Timeframe::SevenDays),
            "30d" => Ok(Timeframe::ThirtyDays),
            _ => Err(anyhow!(
                "Invalid timeframe: {}. Must be '1d', '7d' or '30d'",
                s
            )),
        }
    }
}

/// Input of a single prediction call
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    pub token_id: String,
    pub historical_prices: Vec<f64>,
    pub timeframe: Timeframe,
}

impl PredictionRequest {
    pub fn new(token_id: impl Into<String>, historical_prices: Vec<f64>, timeframe: Timeframe) -> Self {
        Self {
            token_id: token_id.into(),
            historical_prices,
            timeframe,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub token_id: String,
    pub current_price: f64,
    pub predicted_price: f64,
    /// Percent change from `current_price` to `predicted_price`
    pub predicted_change: f64,
    /// Decorative score in [75, 90). Not a statistical confidence interval.
    pub confidence: f64,
    pub timeframe: Timeframe,
}

/// A prediction as handed to persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub result: PredictionResult,
    pub created_at: DateTime<Utc>,
}

impl PredictionRecord {
    pub fn new(result: PredictionResult, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            result,
            created_at,
        }
    }
}

/// Predictions for every timeframe of one token
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAnalysis {
    pub token_id: String,
    pub predictions: Vec<PredictionResult>,
    pub generated_at: DateTime<Utc>,
}

impl TokenAnalysis {
    pub fn for_timeframe(&self, timeframe: Timeframe) -> Option<&PredictionResult> {
        self.predictions.iter().find(|p| p.timeframe == timeframe)
    }
}
