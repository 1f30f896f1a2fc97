use chrono::NaiveDate;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client as HttpClient;
use tracing::{debug, warn};

use super::models::{ChartResponse, ChartResult, Cotacao, FetchError};

/// Yahoo Finance chart API client for daily OHLCV history
pub struct YahooClient {
    http_client: HttpClient,
    base_url: String,
}

impl YahooClient {
    const DEFAULT_BASE_URL: &'static str = "https://query1.finance.yahoo.com/v8/finance/chart";

    // Yahoo rejects the default reqwest agent with 429s
    const BROWSER_USER_AGENT: &'static str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    /// Create a new chart API client
    pub fn new() -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create a new client with custom base URL (for testing)
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url,
        }
    }

    fn create_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(Self::BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// GET /{symbol}?period1=&period2=&interval=1d
    ///
    /// Fetches daily candles for `simbolo` between `inicio` (inclusive) and
    /// `fim` (exclusive), both interpreted as midnight UTC. Days the vendor
    /// reports with null fields are dropped.
    pub async fn historico_diario(
        &self,
        simbolo: &str,
        inicio: NaiveDate,
        fim: NaiveDate,
    ) -> Result<Vec<Cotacao>, FetchError> {
        let url = format!("{}/{}", self.base_url, simbolo);
        let period1 = midnight_utc(inicio);
        let period2 = midnight_utc(fim);

        debug!("Fetching {} candles: period1={} period2={}", simbolo, period1, period2);

        let response = self
            .http_client
            .get(&url)
            .headers(Self::create_headers())
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Http(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|e| FetchError::Http(format!("Failed to read response body: {}", e)))?;

        // The vendor reports unknown symbols as a 404 whose body still
        // carries a chart.error object, so decode before checking status.
        let parsed = match serde_json::from_str::<ChartResponse>(&body_text) {
            Ok(parsed) => parsed,
            Err(e) if status.is_success() => {
                return Err(FetchError::Decodificacao(e.to_string()));
            }
            Err(_) => {
                return Err(FetchError::Http(format!(
                    "Vendor responded with status {}",
                    status.as_u16()
                )));
            }
        };

        parse_cotacoes(parsed)
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

fn value_at<T: Copy>(series: &Option<Vec<Option<T>>>, idx: usize) -> Option<T> {
    series.as_ref().and_then(|values| values.get(idx)).copied().flatten()
}

/// Flatten the chart API's parallel arrays into per-day quotes.
///
/// Rows with a null open, high, low, close or volume are skipped the way
/// yfinance drops NaN rows. A missing adjclose block falls back to the raw
/// close.
pub fn parse_cotacoes(response: ChartResponse) -> Result<Vec<Cotacao>, FetchError> {
    if let Some(error) = response.chart.error {
        return Err(FetchError::Vendor {
            codigo: error.code,
            descricao: error.description,
        });
    }

    let result: ChartResult = response
        .chart
        .result
        .and_then(|mut results| if results.is_empty() { None } else { Some(results.remove(0)) })
        .ok_or(FetchError::SemDados)?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result
        .indicators
        .quote
        .first()
        .cloned()
        .ok_or(FetchError::SemDados)?;
    let adjclose = result
        .indicators
        .adjclose
        .as_ref()
        .and_then(|blocks| blocks.first())
        .map(|block| block.adjclose.clone());

    let mut cotacoes = Vec::with_capacity(timestamps.len());
    let mut skipped = 0usize;

    for (idx, ts) in timestamps.iter().enumerate() {
        let data = match chrono::DateTime::from_timestamp(*ts, 0) {
            Some(dt) => dt.date_naive(),
            None => {
                skipped += 1;
                continue;
            }
        };

        let (open, high, low, close, volume) = match (
            value_at(&quote.open, idx),
            value_at(&quote.high, idx),
            value_at(&quote.low, idx),
            value_at(&quote.close, idx),
            value_at(&quote.volume, idx),
        ) {
            (Some(o), Some(h), Some(l), Some(c), Some(v)) => (o, h, l, c, v),
            _ => {
                skipped += 1;
                continue;
            }
        };

        let fechamento_ajustado = adjclose
            .as_ref()
            .and_then(|series| value_at(series, idx))
            .unwrap_or(close);

        cotacoes.push(Cotacao {
            data,
            abertura: open,
            maxima: high,
            minima: low,
            fechamento: close,
            fechamento_ajustado,
            volume,
        });
    }

    if skipped > 0 {
        warn!("Dropped {} incomplete candle rows", skipped);
    }

    if cotacoes.is_empty() {
        return Err(FetchError::SemDados);
    }

    Ok(cotacoes)
}
