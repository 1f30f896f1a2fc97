//! Wire types for the Yahoo Finance chart API

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level chart API envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

/// Result/error pair; exactly one side is populated
#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

/// In-body vendor error (unknown symbol, bad period)
#[derive(Debug, Clone, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

/// One symbol's series: parallel arrays indexed by timestamp position
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    pub timestamp: Option<Vec<i64>>,
    pub indicators: Indicators,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Indicators {
    pub quote: Vec<QuoteBlock>,
    pub adjclose: Option<Vec<AdjCloseBlock>>,
}

/// Raw OHLCV arrays; the vendor nulls individual entries on gap days
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteBlock {
    pub open: Option<Vec<Option<f64>>>,
    pub high: Option<Vec<Option<f64>>>,
    pub low: Option<Vec<Option<f64>>>,
    pub close: Option<Vec<Option<f64>>>,
    pub volume: Option<Vec<Option<u64>>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdjCloseBlock {
    pub adjclose: Option<Vec<Option<f64>>>,
}

/// One complete trading day, assembled from the parallel wire arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cotacao {
    pub data: NaiveDate,
    pub abertura: f64,
    pub maxima: f64,
    pub minima: f64,
    pub fechamento: f64,
    pub fechamento_ajustado: f64,
    pub volume: u64,
}

/// Errors from the vendor fetch, ordered from transport to content.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Falha na requisição ao provedor: {0}")]
    Http(String),
    #[error("Falha ao decodificar resposta do provedor: {0}")]
    Decodificacao(String),
    #[error("Provedor retornou erro {codigo}: {descricao}")]
    Vendor { codigo: String, descricao: String },
    #[error("Provedor não retornou dados para o período")]
    SemDados,
}
