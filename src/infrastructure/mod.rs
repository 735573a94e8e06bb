pub mod mock;
pub mod persistence;
pub mod repositories;

pub use repositories::{InMemoryPredictionRepository, InMemoryPriceStore};
