// Multi-timeframe analysis and prediction history
pub mod analysis;
pub mod bootstrap;

// Price history sourcing
pub mod market_data;

// Sequence model, training and prediction
pub mod ml;
