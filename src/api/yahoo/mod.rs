pub mod client;
pub mod models;

pub use client::{parse_cotacoes, YahooClient};
pub use models::{ChartResponse, Cotacao, FetchError};
