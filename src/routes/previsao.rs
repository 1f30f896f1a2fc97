use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::PrevisaoState;
use crate::models::{ErroPrevisao, PrevisaoRequest, PrevisaoResponse};
use crate::services::previsao_service::{self, PrevisaoError};

impl IntoResponse for PrevisaoError {
    fn into_response(self) -> Response {
        let status = match self {
            PrevisaoError::Indisponivel => StatusCode::SERVICE_UNAVAILABLE,
            PrevisaoError::JanelaInvalida(_) => StatusCode::BAD_REQUEST,
            PrevisaoError::Interna(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(ErroPrevisao {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// POST /prever/
pub async fn prever(
    State(state): State<PrevisaoState>,
    Json(corpo): Json<PrevisaoRequest>,
) -> Response {
    match previsao_service::prever(state.artifacts(), &corpo.precos_fechamento) {
        Ok(previsao) => (
            StatusCode::OK,
            Json(PrevisaoResponse {
                previsao_proximo_dia: previsao,
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
