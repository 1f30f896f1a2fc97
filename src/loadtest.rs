//! Concurrent load driver for the prediction API
//!
//! Client-side throughput shaping only: a semaphore caps the requests in
//! flight and a fixed delay paces submissions. The service under test gets
//! no retries; every request ends in exactly one classification.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use reqwest::Client as HttpClient;
use reqwest::StatusCode;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::config::LoadTestConfig;
use crate::models::PrevisaoRequest;

/// Terminal classification of one fired request
#[derive(Debug, Clone, PartialEq)]
pub enum Desfecho {
    /// HTTP 200
    Sucesso,
    /// Any other HTTP status, body kept for the report
    FalhaApi { status: u16, corpo: String },
    /// Transport failure or timeout before a status arrived
    ErroConexao(String),
}

/// One completed request with its wall-clock latency
#[derive(Debug, Clone)]
pub struct ResultadoRequisicao {
    pub desfecho: Desfecho,
    pub latencia: Duration,
}

/// Aggregated outcome of a run
#[derive(Debug, Clone, PartialEq)]
pub struct Resumo {
    pub total: usize,
    pub sucessos: usize,
    pub falhas_api: usize,
    pub erros_conexao: usize,
    pub latencia_min: f64,
    pub latencia_media: f64,
    pub latencia_max: f64,
}

impl Resumo {
    /// Human report printed at the end of a run.
    pub fn relatorio(&self) -> String {
        format!(
            "--- Resultados do teste de carga ---\n\
             Total de requisições: {}\n\
             Sucessos: {}\n\
             Falhas da API: {}\n\
             Erros de conexão: {}\n\
             Latência mínima: {:.4}s\n\
             Latência média: {:.4}s\n\
             Latência máxima: {:.4}s",
            self.total,
            self.sucessos,
            self.falhas_api,
            self.erros_conexao,
            self.latencia_min,
            self.latencia_media,
            self.latencia_max
        )
    }
}

/// Synthetic price window: one base level per request, each point jittered
/// within ±1.0 and rounded to cents.
pub fn janela_sintetica(rng: &mut impl Rng, tamanho: usize) -> Vec<f64> {
    let base: f64 = rng.gen_range(20.0..50.0);

    (0..tamanho)
        .map(|_| {
            let preco = base + rng.gen_range(-1.0..1.0);
            (preco * 100.0).round() / 100.0
        })
        .collect()
}

/// Check the service health before firing load.
///
/// `Ok` carries the health body; `Err` means unreachable or non-200.
pub async fn verificar_saude(client: &HttpClient, url: &str) -> Result<String, String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| format!("API inacessível em {}: {}", url, e))?;

    let status = response.status();
    let corpo = response.text().await.unwrap_or_default();

    if status != StatusCode::OK {
        return Err(format!(
            "Health check retornou {}: {}",
            status.as_u16(),
            corpo
        ));
    }

    Ok(corpo)
}

/// Fire the configured number of requests and aggregate the outcomes.
pub async fn executar(cfg: &LoadTestConfig) -> Result<Resumo, String> {
    let client = HttpClient::builder()
        .timeout(Duration::from_secs(cfg.request_timeout_secs))
        .build()
        .map_err(|e| format!("Falha ao criar cliente HTTP: {}", e))?;

    let url = cfg.prever_url();
    let semaphore = Arc::new(Semaphore::new(cfg.max_concurrent));
    let mut handles = Vec::with_capacity(cfg.total_requests);

    info!(
        "Disparando {} requisições contra {} ({} simultâneas)",
        cfg.total_requests, url, cfg.max_concurrent
    );

    for _ in 0..cfg.total_requests {
        let janela = janela_sintetica(&mut rand::thread_rng(), cfg.window_size);
        let client = client.clone();
        let url = url.clone();
        let semaphore = semaphore.clone();

        handles.push(tokio::spawn(async move {
            disparar(&client, &url, janela, semaphore).await
        }));

        tokio::time::sleep(Duration::from_millis(cfg.submission_delay_ms)).await;
    }

    let total = handles.len();
    let passo = (total / 10).max(1);
    let mut resultados = Vec::with_capacity(total);

    for (idx, handle) in handles.into_iter().enumerate() {
        let resultado = match handle.await {
            Ok(resultado) => resultado,
            Err(e) => ResultadoRequisicao {
                desfecho: Desfecho::ErroConexao(format!("Tarefa abortada: {}", e)),
                latencia: Duration::ZERO,
            },
        };
        resultados.push(resultado);

        if (idx + 1) % passo == 0 {
            info!("Progresso: {}/{} requisições concluídas", idx + 1, total);
        }
    }

    Ok(resumir(&resultados))
}

async fn disparar(
    client: &HttpClient,
    url: &str,
    janela: Vec<f64>,
    semaphore: Arc<Semaphore>,
) -> ResultadoRequisicao {
    let _permit = match semaphore.acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            return ResultadoRequisicao {
                desfecho: Desfecho::ErroConexao(format!("Semáforo encerrado: {}", e)),
                latencia: Duration::ZERO,
            }
        }
    };

    let inicio = Instant::now();
    let resposta = client
        .post(url)
        .json(&PrevisaoRequest {
            precos_fechamento: janela,
        })
        .send()
        .await;
    let latencia = inicio.elapsed();

    let desfecho = match resposta {
        Ok(resposta) if resposta.status() == StatusCode::OK => Desfecho::Sucesso,
        Ok(resposta) => {
            let status = resposta.status().as_u16();
            let corpo = resposta.text().await.unwrap_or_default();
            warn!("Requisição respondida com {}: {}", status, corpo);
            Desfecho::FalhaApi { status, corpo }
        }
        Err(e) => Desfecho::ErroConexao(e.to_string()),
    };

    ResultadoRequisicao { desfecho, latencia }
}

/// Aggregate classification counts and latency statistics.
///
/// Latency covers every completed request, failures included; an empty run
/// reports zeroed statistics.
pub fn resumir(resultados: &[ResultadoRequisicao]) -> Resumo {
    let mut resumo = Resumo {
        total: resultados.len(),
        sucessos: 0,
        falhas_api: 0,
        erros_conexao: 0,
        latencia_min: 0.0,
        latencia_media: 0.0,
        latencia_max: 0.0,
    };

    if resultados.is_empty() {
        return resumo;
    }

    let mut soma = 0.0;
    let mut minimo = f64::INFINITY;
    let mut maximo: f64 = 0.0;

    for resultado in resultados {
        match &resultado.desfecho {
            Desfecho::Sucesso => resumo.sucessos += 1,
            Desfecho::FalhaApi { .. } => resumo.falhas_api += 1,
            Desfecho::ErroConexao(_) => resumo.erros_conexao += 1,
        }

        let segundos = resultado.latencia.as_secs_f64();
        soma += segundos;
        minimo = minimo.min(segundos);
        maximo = maximo.max(segundos);
    }

    resumo.latencia_min = minimo;
    resumo.latencia_media = soma / resultados.len() as f64;
    resumo.latencia_max = maximo;
    resumo
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::{get, post};
    use axum::{Json, Router};

    fn resultado(desfecho: Desfecho, segundos: f64) -> ResultadoRequisicao {
        ResultadoRequisicao {
            desfecho,
            latencia: Duration::from_secs_f64(segundos),
        }
    }

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub");
        let addr = listener.local_addr().expect("stub addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve stub");
        });

        format!("http://{}", addr)
    }

    #[test]
    fn test_janela_sintetica_shape_and_bounds() {
        let mut rng = rand::thread_rng();
        let janela = janela_sintetica(&mut rng, 60);

        assert_eq!(janela.len(), 60);
        for preco in &janela {
            assert!((19.0..=51.0).contains(preco), "price out of band: {}", preco);
            let centavos = preco * 100.0;
            assert!(
                (centavos - centavos.round()).abs() < 1e-9,
                "price not rounded to cents: {}",
                preco
            );
        }
    }

    #[test]
    fn test_resumir_counts_and_latency_stats() {
        let resultados = vec![
            resultado(Desfecho::Sucesso, 0.1),
            resultado(
                Desfecho::FalhaApi {
                    status: 400,
                    corpo: "{}".to_string(),
                },
                0.2,
            ),
            resultado(Desfecho::ErroConexao("timeout".to_string()), 0.3),
        ];

        let resumo = resumir(&resultados);

        assert_eq!(resumo.total, 3);
        assert_eq!(resumo.sucessos, 1);
        assert_eq!(resumo.falhas_api, 1);
        assert_eq!(resumo.erros_conexao, 1);
        assert!((resumo.latencia_min - 0.1).abs() < 1e-9);
        assert!((resumo.latencia_media - 0.2).abs() < 1e-9);
        assert!((resumo.latencia_max - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_resumir_empty_run_zeroes_stats() {
        let resumo = resumir(&[]);

        assert_eq!(resumo.total, 0);
        assert_eq!(resumo.latencia_min, 0.0);
        assert_eq!(resumo.latencia_media, 0.0);
        assert_eq!(resumo.latencia_max, 0.0);
    }

    #[test]
    fn test_relatorio_lists_every_classification() {
        let resumo = resumir(&[
            resultado(Desfecho::Sucesso, 0.1),
            resultado(Desfecho::Sucesso, 0.2),
        ]);

        let relatorio = resumo.relatorio();
        assert!(relatorio.contains("Total de requisições: 2"));
        assert!(relatorio.contains("Sucessos: 2"));
        assert!(relatorio.contains("Falhas da API: 0"));
        assert!(relatorio.contains("Erros de conexão: 0"));
        assert!(relatorio.contains("Latência média"));
    }

    #[tokio::test]
    async fn test_verificar_saude_accepts_healthy_service() {
        let stub = Router::new().route(
            "/health",
            get(|| async { Json(serde_json::json!({"status": "ok"})) }),
        );
        let base = spawn_stub(stub).await;

        let client = HttpClient::new();
        let corpo = verificar_saude(&client, &format!("{}/health", base))
            .await
            .expect("healthy");
        assert!(corpo.contains("ok"));
    }

    #[tokio::test]
    async fn test_verificar_saude_rejects_unhealthy_status() {
        let stub = Router::new().route(
            "/health",
            get(|| async {
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"status": "error"})),
                )
            }),
        );
        let base = spawn_stub(stub).await;

        let client = HttpClient::new();
        let err = verificar_saude(&client, &format!("{}/health", base))
            .await
            .expect_err("unhealthy");
        assert!(err.contains("retornou 500"), "got {}", err);
        assert!(err.contains("error"), "got {}", err);
    }

    #[tokio::test]
    async fn test_verificar_saude_rejects_unreachable_service() {
        let client = HttpClient::new();
        let err = verificar_saude(&client, "http://127.0.0.1:9/health")
            .await
            .expect_err("unreachable");
        assert!(err.contains("inacessível"), "got {}", err);
    }

    #[tokio::test]
    async fn test_executar_against_stub_counts_successes() {
        let stub = Router::new().route(
            "/prever/",
            post(|| async { Json(serde_json::json!({"previsao_proximo_dia": 30.5})) }),
        );
        let base = spawn_stub(stub).await;

        let cfg = LoadTestConfig {
            base_url: base,
            total_requests: 5,
            max_concurrent: 2,
            submission_delay_ms: 1,
            request_timeout_secs: 5,
            window_size: 60,
        };

        let resumo = executar(&cfg).await.expect("run");

        assert_eq!(resumo.total, 5);
        assert_eq!(resumo.sucessos, 5);
        assert_eq!(resumo.falhas_api, 0);
        assert_eq!(resumo.erros_conexao, 0);
        assert!(resumo.latencia_max >= resumo.latencia_min);
    }

    #[tokio::test]
    async fn test_executar_against_closed_port_counts_connection_errors() {
        let cfg = LoadTestConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            total_requests: 3,
            max_concurrent: 2,
            submission_delay_ms: 1,
            request_timeout_secs: 1,
            window_size: 60,
        };

        let resumo = executar(&cfg).await.expect("run");

        assert_eq!(resumo.total, 3);
        assert_eq!(resumo.erros_conexao, 3);
        assert_eq!(resumo.sucessos, 0);
    }
}
