use std::process::ExitCode;
use std::time::Duration;

use reqwest::Client as HttpClient;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bovespa_lstm::config::LoadTestConfig;
use bovespa_lstm::loadtest;

#[tokio::main]
async fn main() -> ExitCode {
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

    let config = LoadTestConfig::from_env();

    info!("Verificando saúde da API em {}", config.health_url());
    let health_client = match HttpClient::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            error!("Falha ao criar cliente HTTP: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Gate: no load is fired against a service that is down.
    match loadtest::verificar_saude(&health_client, &config.health_url()).await {
        Ok(corpo) => info!("API respondeu ao health check: {}", corpo),
        Err(e) => {
            error!("Abortando teste de carga: {}", e);
            return ExitCode::FAILURE;
        }
    }

    match loadtest::executar(&config).await {
        Ok(resumo) => {
            println!("{}", resumo.relatorio());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Teste de carga falhou: {}", e);
            ExitCode::FAILURE
        }
    }
}
