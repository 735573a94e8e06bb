// Prediction inputs, outputs and records
pub mod prediction;

// Listed tokens and their synthetic-walk parameters
pub mod token;

// Series windowing and scaling
pub mod ml;

// Repository traits
pub mod repositories;

// Domain-specific error types
pub mod errors;
