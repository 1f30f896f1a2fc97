//! Process-wide Prometheus metrics for the prediction API
//!
//! Registered against the default registry so `/metrics` can render with a
//! single gather. Metric and label names are part of the dashboards' contract.

use lazy_static::lazy_static;
use prometheus::{
    register_counter, register_histogram, register_histogram_vec, Counter, Histogram,
    HistogramVec, TextEncoder,
};

/// Latency bucket boundaries, in seconds, shared by both histograms.
pub const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

lazy_static! {
    pub static ref PREVISOES_TOTAL: Counter = register_counter!(
        "previsoes_total",
        "Total de previsões concluídas com sucesso"
    )
    .expect("register previsoes_total");

    pub static ref PREVISOES_ERROS_TOTAL: Counter = register_counter!(
        "previsoes_erros_total",
        "Total de requisições de previsão que falharam"
    )
    .expect("register previsoes_erros_total");

    pub static ref MODELO_CARREGADO_SUCESSO: Counter = register_counter!(
        "modelo_carregado_sucesso_total",
        "Cargas bem-sucedidas dos artefatos de modelo"
    )
    .expect("register modelo_carregado_sucesso_total");

    pub static ref MODELO_CARREGADO_FALHA: Counter = register_counter!(
        "modelo_carregado_falha_total",
        "Cargas malsucedidas dos artefatos de modelo"
    )
    .expect("register modelo_carregado_falha_total");

    pub static ref PREVISAO_DURACAO: Histogram = register_histogram!(
        "previsao_duracao_segundos",
        "Duração do processamento de cada previsão, em segundos",
        LATENCY_BUCKETS.to_vec()
    )
    .expect("register previsao_duracao_segundos");

    pub static ref HTTP_REQUESTS_DURACAO: HistogramVec = register_histogram_vec!(
        "http_requests_duracao_segundos",
        "Duração das requisições HTTP atendidas, em segundos",
        &["method", "path", "status"],
        LATENCY_BUCKETS.to_vec()
    )
    .expect("register http_requests_duracao_segundos");
}

/// Record one served HTTP request into the labeled histogram.
pub fn observar_http(method: &str, path: &str, status: u16, seconds: f64) {
    HTTP_REQUESTS_DURACAO
        .with_label_values(&[method, path, &status.to_string()])
        .observe(seconds);
}

/// Render every registered metric in the Prometheus text format.
pub fn render() -> Result<String, String> {
    TextEncoder::new()
        .encode_to_string(&prometheus::gather())
        .map_err(|e| format!("Failed to encode metrics: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_exposes_touched_metrics() {
        PREVISOES_TOTAL.inc();
        PREVISOES_ERROS_TOTAL.inc();
        PREVISAO_DURACAO.observe(0.02);

        let texto = render().expect("metrics should render");

        assert!(texto.contains("previsoes_total"));
        assert!(texto.contains("previsoes_erros_total"));
        assert!(texto.contains("previsao_duracao_segundos_bucket{le=\"0.005\"}"));
        assert!(texto.contains("previsao_duracao_segundos_bucket{le=\"10\"}"));
    }

    #[test]
    fn test_http_histogram_carries_labels() {
        observar_http("POST", "/prever/", 200, 0.01);

        let texto = render().expect("metrics should render");
        assert!(texto.contains("http_requests_duracao_segundos_bucket"));
        assert!(texto.contains("method=\"POST\""));
        assert!(texto.contains("path=\"/prever/\""));
        assert!(texto.contains("status=\"200\""));
    }
}
