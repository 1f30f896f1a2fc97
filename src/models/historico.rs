//! Historical price records served by the bovespa API

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::yahoo::Cotacao;

/// One trading day, shaped like a flattened yfinance row.
///
/// Field order is the wire order: the vendor's index column first, then the
/// OHLCV columns as a single flat level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistroHistorico {
    #[serde(rename = "Date")]
    pub data: NaiveDate,
    #[serde(rename = "Open")]
    pub abertura: f64,
    #[serde(rename = "High")]
    pub maxima: f64,
    #[serde(rename = "Low")]
    pub minima: f64,
    #[serde(rename = "Close")]
    pub fechamento: f64,
    #[serde(rename = "Adj Close")]
    pub fechamento_ajustado: f64,
    #[serde(rename = "Volume")]
    pub volume: u64,
}

impl From<Cotacao> for RegistroHistorico {
    fn from(cotacao: Cotacao) -> Self {
        Self {
            data: cotacao.data,
            abertura: cotacao.abertura,
            maxima: cotacao.maxima,
            minima: cotacao.minima,
            fechamento: cotacao.fechamento,
            fechamento_ajustado: cotacao.fechamento_ajustado,
            volume: cotacao.volume,
        }
    }
}

/// Error body for the bovespa API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErroHistorico {
    pub erro: String,
}
