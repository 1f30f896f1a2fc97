pub mod artifacts;
pub mod lstm;
pub mod scaler;

pub use artifacts::{ForecastError, ModelArtifacts};
pub use lstm::{DenseLayer, LstmLayer, LstmModel};
pub use scaler::MinMaxScaler;

/// Number of closing prices the model consumes per prediction. Must match
/// the window the training pipeline used.
pub const WINDOW_SIZE: usize = 60;
