//! Price series windowing and min-max scaling.

use crate::domain::errors::PredictionError;

/// `(min, max)` of a whole price series.
///
/// A degenerate range (`max == min`) maps every value to `0.0` and
/// denormalizes back to `min`, so a flat series predicts itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationRange {
    min: f64,
    max: f64,
}

impl NormalizationRange {
    pub fn from_prices(prices: &[f64]) -> Option<Self> {
        if prices.is_empty() {
            return None;
        }
        let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn is_degenerate(&self) -> bool {
        self.span() <= f64::EPSILON * self.max.abs().max(1.0)
    }

    pub fn normalize(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        (value - self.min) / self.span()
    }

    pub fn denormalize(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            return self.min;
        }
        value * self.span() + self.min
    }
}

/// Normalized (window, target) pairs built from a price series
#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub windows: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
    pub range: NormalizationRange,
    pub window_size: usize,
}

impl TrainingSet {
    /// Slide a window of `window_size` over `prices`; each window is paired
    /// with the price right after it. The range covers the whole series.
    pub fn build(prices: &[f64], window_size: usize) -> Result<Self, PredictionError> {
        if window_size == 0 {
            return Err(PredictionError::training("window size must be positive"));
        }
        if prices.len() <= window_size {
            return Err(PredictionError::training(format!(
                "{} prices yield no training windows of size {}",
                prices.len(),
                window_size
            )));
        }

        let range = NormalizationRange::from_prices(prices)
            .ok_or_else(|| PredictionError::training("empty price series"))?;

        let count = prices.len() - window_size;
        let mut windows = Vec::with_capacity(count);
        let mut targets = Vec::with_capacity(count);
        for i in 0..count {
            windows.push(
                prices[i..i + window_size]
                    .iter()
                    .map(|&p| range.normalize(p))
                    .collect(),
            );
            targets.push(range.normalize(prices[i + window_size]));
        }

        Ok(Self {
            windows,
            targets,
            range,
            window_size,
        })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Last `window_size` prices scaled with this set's range
    pub fn inference_window(&self, prices: &[f64]) -> Result<Vec<f64>, PredictionError> {
        if prices.len() < self.window_size {
            return Err(PredictionError::training(format!(
                "inference needs {} prices, got {}",
                self.window_size,
                prices.len()
            )));
        }
        Ok(prices[prices.len() - self.window_size..]
            .iter()
            .map(|&p| self.range.normalize(p))
            .collect())
    }
}
