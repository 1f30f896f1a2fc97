use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{error, warn};

use crate::forecast::{ModelArtifacts, WINDOW_SIZE};
use crate::metrics;

/// Failure modes of a prediction request, ordered by HTTP mapping
#[derive(Debug, Clone, Error)]
pub enum PrevisaoError {
    /// Artifacts never loaded; the service is up but degraded (503)
    #[error("Modelo não está disponível no momento. Tente novamente mais tarde.")]
    Indisponivel,
    /// Window length differs from the trained one (400)
    #[error("A lista 'precos_fechamento' deve conter exatamente {} valores.", WINDOW_SIZE)]
    JanelaInvalida(usize),
    /// Inference failed (500)
    #[error("Erro interno ao processar a previsão: {0}")]
    Interna(String),
}

/// Run one prediction, recording the outcome counters and the wall-clock
/// duration whatever the result.
pub fn prever(
    artifacts: Option<&Arc<ModelArtifacts>>,
    janela: &[f64],
) -> Result<f64, PrevisaoError> {
    let inicio = Instant::now();
    let resultado = executar(artifacts, janela);

    metrics::PREVISAO_DURACAO.observe(inicio.elapsed().as_secs_f64());
    match &resultado {
        Ok(_) => metrics::PREVISOES_TOTAL.inc(),
        Err(_) => metrics::PREVISOES_ERROS_TOTAL.inc(),
    }

    resultado
}

/// Readiness first, then shape, then the forward pass. The model is never
/// invoked for a request that fails validation.
fn executar(
    artifacts: Option<&Arc<ModelArtifacts>>,
    janela: &[f64],
) -> Result<f64, PrevisaoError> {
    let artifacts = artifacts.ok_or(PrevisaoError::Indisponivel)?;

    if janela.len() != WINDOW_SIZE {
        warn!(
            "Janela de previsão com tamanho inválido: {} valores (esperado {})",
            janela.len(),
            WINDOW_SIZE
        );
        return Err(PrevisaoError::JanelaInvalida(janela.len()));
    }

    artifacts.predict_next(janela).map_err(|e| {
        error!("Falha ao executar a previsão: {}", e);
        PrevisaoError::Interna(e.to_string())
    })
}
