//! Environment-driven configuration for the binaries
//!
//! Every knob has a hardcoded default so the stack runs with a bare
//! environment; `.env` files are honored via dotenv in each `main`.

use std::env;
use std::fmt::Debug;
use std::str::FromStr;

use tracing::warn;

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> T
where
    T: FromStr + Debug + Copy,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring {}={:?}, using default {:?}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

/// Settings of the historical-price service
#[derive(Debug, Clone)]
pub struct BovespaConfig {
    pub host: String,
    pub port: u16,
}

impl BovespaConfig {
    pub fn from_env() -> Self {
        Self {
            host: env_or("BOVESPA_HOST", "0.0.0.0"),
            port: parse_env("BOVESPA_PORT", 5001),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Settings of the prediction service, artifact paths included
#[derive(Debug, Clone)]
pub struct PrevisaoConfig {
    pub host: String,
    pub port: u16,
    pub model_path: String,
    pub scaler_path: String,
}

impl PrevisaoConfig {
    pub fn from_env() -> Self {
        Self {
            host: env_or("PREVISAO_HOST", "0.0.0.0"),
            port: parse_env("PREVISAO_PORT", 8000),
            model_path: env_or("MODEL_PATH", "melhor_modelo_lstm.json"),
            scaler_path: env_or("SCALER_PATH", "min_max_scaler.json"),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Settings of the load driver
#[derive(Debug, Clone)]
pub struct LoadTestConfig {
    pub base_url: String,
    pub total_requests: usize,
    pub max_concurrent: usize,
    pub submission_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub window_size: usize,
}

impl LoadTestConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: env_or("LOAD_TEST_BASE_URL", "http://127.0.0.1:8000"),
            total_requests: parse_env("LOAD_TEST_TOTAL", 100),
            max_concurrent: parse_env("LOAD_TEST_CONCURRENCY", 10),
            submission_delay_ms: parse_env("LOAD_TEST_DELAY_MS", 100),
            request_timeout_secs: parse_env("LOAD_TEST_TIMEOUT_SECS", 10),
            window_size: parse_env("LOAD_TEST_WINDOW", crate::forecast::WINDOW_SIZE),
        }
    }

    pub fn prever_url(&self) -> String {
        format!("{}/prever/", self.base_url)
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }
}

/// Settings of the demonstration consumer
#[derive(Debug, Clone)]
pub struct ConsumirConfig {
    pub previsao_base_url: String,
    pub simbolo: String,
}

impl ConsumirConfig {
    pub fn from_env() -> Self {
        Self {
            previsao_base_url: env_or("PREVISAO_BASE_URL", "http://127.0.0.1:8000"),
            simbolo: env_or("CONSUMIR_SIMBOLO", "PETR4.SA"),
        }
    }
}
