use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::{error, warn};

use super::BovespaState;
use crate::api::yahoo::FetchError;
use crate::models::ErroHistorico;
use crate::services::historico_service;

/// Query string of `GET /historico_acoes`. Every field is optional so that
/// absence can be answered with the canonical 400 body instead of an
/// extractor rejection; an empty value counts as absent.
#[derive(Debug, Deserialize)]
pub struct HistoricoQuery {
    pub simbolo: Option<String>,
    pub data_inicio: Option<String>,
    pub data_fim: Option<String>,
}

impl HistoricoQuery {
    /// All three parameters, present and non-empty, or `None`.
    fn obrigatorios(&self) -> Option<(&str, &str, &str)> {
        match (
            self.simbolo.as_deref().filter(|s| !s.is_empty()),
            self.data_inicio.as_deref().filter(|s| !s.is_empty()),
            self.data_fim.as_deref().filter(|s| !s.is_empty()),
        ) {
            (Some(s), Some(i), Some(f)) => Some((s, i, f)),
            _ => None,
        }
    }
}

/// GET /historico_acoes
pub async fn obter_historico(
    State(state): State<BovespaState>,
    Query(params): Query<HistoricoQuery>,
) -> Response {
    let (simbolo, data_inicio, data_fim) = match params.obrigatorios() {
        Some(valores) => valores,
        None => {
            warn!("Requisição de histórico sem parâmetros obrigatórios");
            return erro(
                StatusCode::BAD_REQUEST,
                "Parâmetros 'simbolo', 'data_inicio' e 'data_fim' são obrigatórios."
                    .to_string(),
            );
        }
    };

    let (inicio, fim) = match historico_service::parse_periodo(data_inicio, data_fim) {
        Ok(periodo) => periodo,
        Err(mensagem) => {
            warn!("Período inválido: '{}' a '{}'", data_inicio, data_fim);
            return erro(StatusCode::BAD_REQUEST, mensagem);
        }
    };

    match historico_service::buscar_historico(&state.client, simbolo, inicio, fim).await {
        Ok(registros) => (StatusCode::OK, Json(registros)).into_response(),
        Err(FetchError::SemDados) => sem_dados(simbolo),
        // The vendor flags unknown symbols in-body; to callers that is the
        // same empty result as a valid symbol with no trading days.
        Err(FetchError::Vendor { codigo, descricao }) => {
            warn!("Provedor rejeitou '{}': {} ({})", simbolo, codigo, descricao);
            sem_dados(simbolo)
        }
        Err(e) => {
            error!("Falha ao buscar histórico de '{}': {}", simbolo, e);
            erro(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Erro ao buscar dados: {}", e),
            )
        }
    }
}

fn sem_dados(simbolo: &str) -> Response {
    erro(
        StatusCode::NOT_FOUND,
        format!(
            "Nenhum dado encontrado para o símbolo '{}' no período especificado.",
            simbolo
        ),
    )
}

fn erro(status: StatusCode, mensagem: String) -> Response {
    (status, Json(ErroHistorico { erro: mensagem })).into_response()
}
