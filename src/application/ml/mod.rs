pub mod lstm;
pub mod predictor;
pub mod trainer;

pub use predictor::PricePredictor;
pub use trainer::{LstmTrainer, ModelTrainer, TrainedModel, TrainerConfig, TrainingHistory};
