//! Min-max scaler fitted by the training pipeline

use serde::{Deserialize, Serialize};

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// Fitted min-max scaler, exported as JSON by the training pipeline.
///
/// Maps a raw price into `feature_range` with the affine transform
/// `(x - data_min) / (data_max - data_min)` and back. For a non-degenerate
/// fit (`data_max > data_min`) the two directions are exact inverses up to
/// floating-point error. A degenerate fit maps every input to the midpoint
/// of the feature range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub data_min: f64,
    pub data_max: f64,
    /// Target range of normalized values, `[0, 1]` unless the training
    /// pipeline overrides it.
    #[serde(default = "default_feature_range")]
    pub feature_range: (f64, f64),
}

impl MinMaxScaler {
    /// Create a scaler from known fit bounds.
    pub fn new(data_min: f64, data_max: f64) -> Self {
        Self {
            data_min,
            data_max,
            feature_range: default_feature_range(),
        }
    }

    /// Fit a scaler on raw values.
    ///
    /// An empty slice produces a degenerate scaler with both bounds at 0.
    pub fn fit(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::new(0.0, 0.0);
        }

        let data_min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let data_max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        Self::new(data_min, data_max)
    }

    /// Map a raw value into the feature range.
    pub fn transform(&self, value: f64) -> f64 {
        let (lo, hi) = self.feature_range;
        let range = self.data_max - self.data_min;

        if range == 0.0 {
            return (lo + hi) / 2.0;
        }

        (value - self.data_min) / range * (hi - lo) + lo
    }

    /// Map a normalized value back into raw units.
    pub fn inverse_transform(&self, value: f64) -> f64 {
        let (lo, hi) = self.feature_range;
        let width = hi - lo;

        if width == 0.0 {
            return self.data_min;
        }

        (value - lo) / width * (self.data_max - self.data_min) + self.data_min
    }
}
