use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bovespa_lstm::config::PrevisaoConfig;
use bovespa_lstm::forecast::ModelArtifacts;
use bovespa_lstm::metrics;
use bovespa_lstm::routes::{previsao_router, PrevisaoState};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("bovespa_lstm=debug".parse().unwrap())
                .add_directive("hyper=warn".parse().unwrap()),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let config = PrevisaoConfig::from_env();
    info!("Iniciando api-previsao em {}", config.bind_addr());

    // One load attempt at startup. A failure leaves the process serving in
    // degraded mode; there is no retry or hot reload.
    let artifacts = match ModelArtifacts::load(&config.model_path, &config.scaler_path) {
        Ok(artifacts) => {
            info!("Modelo carregado de {}", config.model_path);
            info!("Scaler carregado de {}", config.scaler_path);
            metrics::MODELO_CARREGADO_SUCESSO.inc();
            Some(artifacts)
        }
        Err(e) => {
            error!("Falha ao carregar artefatos: {}", e);
            metrics::MODELO_CARREGADO_FALHA.inc();
            None
        }
    };

    let state = PrevisaoState::new(artifacts);
    let router = previsao_router(state);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr()).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Falha ao escutar em {}: {}", config.bind_addr(), e);
            return;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Servidor encerrado com erro: {}", e);
    }
}
