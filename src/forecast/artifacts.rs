//! Loading and validation of the exported model and scaler artifacts

use std::fs;
use std::path::Path;

use ndarray::Array2;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::forecast::{LstmModel, MinMaxScaler};

/// Errors raised while loading artifacts or running the forward pass.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Failed to read artifact {0}: {1}")]
    Read(String, std::io::Error),
    #[error("Failed to parse artifact {0}: {1}")]
    Parse(String, serde_json::Error),
    #[error("Invalid model artifact: {0}")]
    InvalidModel(String),
    #[error("Model produced a non-finite prediction: {0}")]
    NonFinite(f64),
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ForecastError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| ForecastError::Read(path.display().to_string(), e))?;

    serde_json::from_str(&raw).map_err(|e| ForecastError::Parse(path.display().to_string(), e))
}

/// The model and its companion scaler, loaded together and validated once.
///
/// Both artifacts come out of the same training run; serving them as a pair
/// keeps the normalization applied at inference identical to the one the
/// model was trained against.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    model: LstmModel,
    scaler: MinMaxScaler,
}

impl ModelArtifacts {
    /// Pair a model with its scaler, rejecting inconsistent weights up front
    /// so the forward pass never has to.
    pub fn new(model: LstmModel, scaler: MinMaxScaler) -> Result<Self, ForecastError> {
        model.validate().map_err(ForecastError::InvalidModel)?;

        if model.input_size != 1 {
            return Err(ForecastError::InvalidModel(format!(
                "model expects {} input features, the serving pipeline provides 1",
                model.input_size
            )));
        }

        Ok(Self { model, scaler })
    }

    /// Load both artifacts from disk.
    pub fn load(
        model_path: impl AsRef<Path>,
        scaler_path: impl AsRef<Path>,
    ) -> Result<Self, ForecastError> {
        let model: LstmModel = read_json(model_path.as_ref())?;
        let scaler: MinMaxScaler = read_json(scaler_path.as_ref())?;

        Self::new(model, scaler)
    }

    pub fn scaler(&self) -> &MinMaxScaler {
        &self.scaler
    }

    pub fn model(&self) -> &LstmModel {
        &self.model
    }

    /// Forecast the closing price for the day after the given window.
    ///
    /// Normalizes the window with the fitted scaler, runs the forward pass
    /// and denormalizes the readout. Window length is the caller's contract;
    /// any length runs, the model was simply trained on a fixed one.
    pub fn predict_next(&self, window: &[f64]) -> Result<f64, ForecastError> {
        let normalized =
            Array2::from_shape_fn((window.len(), 1), |(i, _)| self.scaler.transform(window[i]));

        let predicted = self.model.forward(&normalized);
        let price = self.scaler.inverse_transform(predicted);

        if !price.is_finite() {
            return Err(ForecastError::NonFinite(price));
        }

        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::testutil::{constant_model, zero_layer};
    use crate::forecast::WINDOW_SIZE;
    use ndarray::Array1;
    use std::io::Write;

    fn write_artifact(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).expect("artifact file");
        file.write_all(contents.as_bytes()).expect("artifact write");
        path
    }

    #[test]
    fn test_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let model_json = serde_json::to_string(&constant_model(0.5)).expect("model json");
        let scaler_json =
            serde_json::to_string(&MinMaxScaler::new(5.0, 20.0)).expect("scaler json");

        let model_path = write_artifact(dir.path(), "modelo.json", &model_json);
        let scaler_path = write_artifact(dir.path(), "scaler.json", &scaler_json);

        let artifacts = ModelArtifacts::load(&model_path, &scaler_path).expect("load");
        assert_eq!(artifacts.scaler().data_min, 5.0);
        assert_eq!(artifacts.model().hidden_size, 4);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let scaler_json =
            serde_json::to_string(&MinMaxScaler::new(5.0, 20.0)).expect("scaler json");
        let scaler_path = write_artifact(dir.path(), "scaler.json", &scaler_json);

        let err = ModelArtifacts::load(dir.path().join("ausente.json"), &scaler_path)
            .expect_err("missing model should fail");
        assert!(matches!(err, ForecastError::Read(_, _)), "got {:?}", err);
        assert!(err.to_string().contains("ausente.json"));
    }

    #[test]
    fn test_load_malformed_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let model_path = write_artifact(dir.path(), "modelo.json", "{ not json");
        let scaler_json =
            serde_json::to_string(&MinMaxScaler::new(5.0, 20.0)).expect("scaler json");
        let scaler_path = write_artifact(dir.path(), "scaler.json", &scaler_json);

        let err = ModelArtifacts::load(&model_path, &scaler_path)
            .expect_err("malformed model should fail");
        assert!(matches!(err, ForecastError::Parse(_, _)), "got {:?}", err);
    }

    #[test]
    fn test_new_rejects_bad_shapes() {
        let mut model = constant_model(0.0);
        model.dense.bias = Array1::zeros(3);

        let err = ModelArtifacts::new(model, MinMaxScaler::new(0.0, 1.0))
            .expect_err("bad readout should fail");
        assert!(matches!(err, ForecastError::InvalidModel(_)), "got {:?}", err);
    }

    #[test]
    fn test_new_rejects_multivariate_model() {
        let mut model = constant_model(0.0);
        model.input_size = 2;
        model.layers = vec![zero_layer(2, 4)];

        let err = ModelArtifacts::new(model, MinMaxScaler::new(0.0, 1.0))
            .expect_err("multivariate model should fail");
        assert!(err.to_string().contains("input features"));
    }

    #[test]
    fn test_prediction_stays_within_fitted_range() {
        // Zero recurrent weights make the readout a constant 0.5, the exact
        // middle of the normalized range, so the denormalized forecast must
        // land inside the fitted price range.
        let artifacts = ModelArtifacts::new(constant_model(0.5), MinMaxScaler::new(5.0, 20.0))
            .expect("artifacts");

        let window = vec![10.0; WINDOW_SIZE];
        let price = artifacts.predict_next(&window).expect("prediction");

        assert!((5.0..=20.0).contains(&price), "out of range: {}", price);
        assert!((price - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_prediction_is_an_error() {
        let artifacts = ModelArtifacts::new(constant_model(f64::NAN), MinMaxScaler::new(5.0, 20.0))
            .expect("artifacts");

        let err = artifacts
            .predict_next(&vec![10.0; WINDOW_SIZE])
            .expect_err("NaN readout should fail");
        assert!(matches!(err, ForecastError::NonFinite(_)), "got {:?}", err);
    }
}
