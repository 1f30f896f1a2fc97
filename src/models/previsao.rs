//! Request and response bodies for the prediction API

use serde::{Deserialize, Serialize};

/// Body of `POST /prever/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrevisaoRequest {
    pub precos_fechamento: Vec<f64>,
}

/// Body of a successful prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrevisaoResponse {
    pub previsao_proximo_dia: f64,
}

/// Error body for the prediction API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErroPrevisao {
    pub detail: String,
}
