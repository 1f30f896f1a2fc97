use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bovespa_lstm::api::yahoo::YahooClient;
use bovespa_lstm::config::BovespaConfig;
use bovespa_lstm::routes::{bovespa_router, BovespaState};

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

    let config = BovespaConfig::from_env();
    info!("Iniciando api-bovespa em {}", config.bind_addr());

    let state = BovespaState::new(YahooClient::new());
    let router = bovespa_router(state);

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
