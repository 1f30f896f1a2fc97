use std::process::ExitCode;

use chrono::{Duration, Utc};
use reqwest::Client as HttpClient;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use bovespa_lstm::api::yahoo::YahooClient;
use bovespa_lstm::config::ConsumirConfig;
use bovespa_lstm::forecast::WINDOW_SIZE;
use bovespa_lstm::models::{PrevisaoRequest, PrevisaoResponse};

/// Demonstration client: health check, one real forecast, then a window the
/// service must refuse.
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

    let config = ConsumirConfig::from_env();
    let client = HttpClient::new();

    let health_url = format!("{}/health", config.previsao_base_url);
    let saude = match client.get(&health_url).send().await {
        Ok(resposta) => resposta.text().await.unwrap_or_default(),
        Err(e) => {
            error!("API de previsão inacessível em {}: {}", health_url, e);
            return ExitCode::FAILURE;
        }
    };
    println!("Saúde da API: {}", pretty_json(&saude));

    let janela = match janela_real(&config.simbolo).await {
        Ok(janela) => {
            info!(
                "Usando os últimos {} fechamentos reais de {}",
                janela.len(),
                config.simbolo
            );
            janela
        }
        Err(e) => {
            warn!("Sem dados reais para {} ({}), usando janela sintética", config.simbolo, e);
            janela_linspace(30.0, 35.0, WINDOW_SIZE)
        }
    };

    let prever_url = format!("{}/prever/", config.previsao_base_url);
    let resposta = match client
        .post(&prever_url)
        .json(&PrevisaoRequest {
            precos_fechamento: janela,
        })
        .send()
        .await
    {
        Ok(resposta) => resposta,
        Err(e) => {
            error!("Falha ao solicitar previsão: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if resposta.status().is_success() {
        match resposta.json::<PrevisaoResponse>().await {
            Ok(previsao) => println!(
                "Previsão para o próximo dia: {:.2}",
                previsao.previsao_proximo_dia
            ),
            Err(e) => {
                error!("Resposta de previsão inválida: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        let status = resposta.status().as_u16();
        let corpo = resposta.text().await.unwrap_or_default();
        error!("Previsão recusada ({}): {}", status, corpo);
        return ExitCode::FAILURE;
    }

    // The service must refuse short windows; show the 400 it answers with.
    let invalida = vec![10.0, 20.0, 30.0];
    println!(
        "Enviando janela propositalmente inválida ({} valores)...",
        invalida.len()
    );
    match client
        .post(&prever_url)
        .json(&PrevisaoRequest {
            precos_fechamento: invalida,
        })
        .send()
        .await
    {
        Ok(resposta) => {
            let status = resposta.status().as_u16();
            let corpo = resposta.text().await.unwrap_or_default();
            println!("Resposta da API ({}): {}", status, pretty_json(&corpo));
        }
        Err(e) => error!("Falha na demonstração de validação: {}", e),
    }

    ExitCode::SUCCESS
}

/// Trailing window of real closes, or an error naming what is missing.
async fn janela_real(simbolo: &str) -> Result<Vec<f64>, String> {
    let fim = Utc::now().date_naive();
    let inicio = fim - Duration::days(90);

    let cotacoes = YahooClient::new()
        .historico_diario(simbolo, inicio, fim)
        .await
        .map_err(|e| e.to_string())?;

    if cotacoes.len() < WINDOW_SIZE {
        return Err(format!("apenas {} pregões disponíveis", cotacoes.len()));
    }

    Ok(cotacoes[cotacoes.len() - WINDOW_SIZE..]
        .iter()
        .map(|c| c.fechamento)
        .collect())
}

/// Evenly spaced synthetic closes from `de` to `ate`, endpoints included.
fn janela_linspace(de: f64, ate: f64, pontos: usize) -> Vec<f64> {
    if pontos < 2 {
        return vec![de; pontos];
    }

    let passo = (ate - de) / (pontos - 1) as f64;
    (0..pontos).map(|i| de + passo * i as f64).collect()
}

fn pretty_json(corpo: &str) -> String {
    serde_json::from_str::<serde_json::Value>(corpo)
        .and_then(|valor| serde_json::to_string_pretty(&valor))
        .unwrap_or_else(|_| corpo.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_janela_linspace_covers_endpoints() {
        let janela = janela_linspace(30.0, 35.0, 60);

        assert_eq!(janela.len(), 60);
        assert!((janela[0] - 30.0).abs() < 1e-9);
        assert!((janela[59] - 35.0).abs() < 1e-9);
        assert!(janela.windows(2).all(|par| par[1] > par[0]));
    }

    #[test]
    fn test_pretty_json_passes_through_plain_text() {
        assert_eq!(pretty_json("not json"), "not json");
        assert!(pretty_json("{\"a\":1}").contains("\"a\": 1"));
    }
}
