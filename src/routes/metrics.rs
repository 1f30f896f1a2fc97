use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::error;

/// GET /metrics in the Prometheus text exposition format
pub async fn metricas() -> Response {
    match crate::metrics::render() {
        Ok(texto) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            texto,
        )
            .into_response(),
        Err(e) => {
            error!("Falha ao renderizar métricas: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}
