//! Health body reported by the prediction API

use serde::{Deserialize, Serialize};

/// Health report. The endpoint always answers 200; degradation is signaled
/// in the body so probes can distinguish "up" from "ready".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

impl HealthStatus {
    /// Artifacts loaded, predictions available.
    pub fn operational() -> Self {
        Self {
            status: "ok".to_string(),
            message: "Modelo carregado e API operacional.".to_string(),
        }
    }

    /// Process is up but the model or scaler failed to load.
    pub fn degraded() -> Self {
        Self {
            status: "error".to_string(),
            message: "Modelo ou scaler não carregado.".to_string(),
        }
    }
}
