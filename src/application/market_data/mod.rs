// Historical price sourcing with synthetic fallback
pub mod provider;
pub mod synthetic;

pub use provider::HistoricalDataProvider;
pub use synthetic::SyntheticSeriesGenerator;
