use chrono::NaiveDate;
use tracing::info;

use crate::api::yahoo::{FetchError, YahooClient};
use crate::models::RegistroHistorico;

/// Parse the period strings from the query, enforcing `YYYY-MM-DD`.
///
/// The message is the one the endpoint returns verbatim on 400.
pub fn parse_periodo(data_inicio: &str, data_fim: &str) -> Result<(NaiveDate, NaiveDate), String> {
    let inicio = NaiveDate::parse_from_str(data_inicio, "%Y-%m-%d");
    let fim = NaiveDate::parse_from_str(data_fim, "%Y-%m-%d");

    match (inicio, fim) {
        (Ok(inicio), Ok(fim)) => Ok((inicio, fim)),
        _ => Err("Formato de data inválido. Use 'YYYY-MM-DD'.".to_string()),
    }
}

/// Fetch the daily history for a symbol and flatten it into wire records.
///
/// The end date is exclusive, matching the vendor's period semantics.
pub async fn buscar_historico(
    client: &YahooClient,
    simbolo: &str,
    inicio: NaiveDate,
    fim: NaiveDate,
) -> Result<Vec<RegistroHistorico>, FetchError> {
    info!("Buscando histórico de {} entre {} e {}", simbolo, inicio, fim);

    let cotacoes = client.historico_diario(simbolo, inicio, fim).await?;

    info!("Histórico de {}: {} pregões", simbolo, cotacoes.len());

    Ok(cotacoes.into_iter().map(RegistroHistorico::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_periodo_valid() {
        let (inicio, fim) = parse_periodo("2024-01-01", "2024-02-01").expect("valid period");

        assert_eq!(inicio, NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"));
        assert_eq!(fim, NaiveDate::from_ymd_opt(2024, 2, 1).expect("date"));
    }

    #[test]
    fn test_parse_periodo_rejects_wrong_layout() {
        let err = parse_periodo("01-01-2024", "2024-02-01").expect_err("bad layout");
        assert!(err.contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_parse_periodo_rejects_impossible_date() {
        let err = parse_periodo("2024-01-01", "2024-13-40").expect_err("bad date");
        assert!(err.contains("Formato de data inválido"));
    }
}
