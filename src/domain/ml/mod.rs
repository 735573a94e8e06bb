pub mod series;

pub use series::{NormalizationRange, TrainingSet};
