//! Banco Central del Ecuador daily indicator feed.
//!
//! The feed is one JSON document holding every published indicator as flat
//! `{Indicador, Fecha, Valor, Medida}` records; `extract::find_records` digs
//! the list out of whatever envelope it arrives in.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::domain::IndicatorSpec;
use crate::error::AppError;
use crate::extract::normalize;

pub const DEFAULT_SOURCE_URL: &str =
    "https://contenido.bce.fin.ec/documentos/informacioneconomica/indicadores/general/datos_formulario.json";

/// Measure used to pick the gold quote among its published units.
pub const GOLD_MEASURE: &str = "USD / Onza Troy";

/// Indicators extracted from the feed, in output order.
pub const INDICATORS: [IndicatorSpec; 2] = [
    IndicatorSpec {
        key: "riesgo_pais",
        label: "Riesgo País",
        indicator: is_country_risk,
        measure: None,
    },
    IndicatorSpec {
        key: "oro",
        label: "Precio del Oro",
        indicator: is_gold_price,
        measure: Some(is_troy_ounce),
    },
];

/// `normalize` already folds the `PaÃ­s` spelling onto `pais`.
pub fn is_country_risk(indicator: &str) -> bool {
    normalize(indicator) == "riesgo pais"
}

pub fn is_gold_price(indicator: &str) -> bool {
    normalize(indicator) == "precio del oro"
}

pub fn is_troy_ounce(measure: &str) -> bool {
    measure.trim() == GOLD_MEASURE
}

pub struct BceClient {
    client: Client,
    url: String,
}

impl BceClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("indicadores/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download and parse the feed document.
    pub fn fetch_document(&self) -> Result<Value, AppError> {
        info!(url = %self.url, "fetching BCE feed");

        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| AppError::new(4, format!("BCE request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("BCE request failed with status {}.", resp.status()),
            ));
        }

        let body: Value = resp
            .json()
            .map_err(|e| AppError::new(4, format!("Failed to parse BCE response as JSON: {e}")))?;

        debug!("BCE feed parsed");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_risk_matches_both_encodings() {
        assert!(is_country_risk("Riesgo País"));
        assert!(is_country_risk("RIESGO PA\u{c3}\u{ad}S "));
        assert!(!is_country_risk("Riesgo País (promedio)"));
    }

    #[test]
    fn gold_requires_exact_troy_ounce_measure() {
        assert!(is_gold_price("Precio del Oro"));
        assert!(is_troy_ounce(" USD / Onza Troy "));
        assert!(!is_troy_ounce("USD / Gramo"));
        assert!(!is_troy_ounce("usd / onza troy"));
    }

    #[test]
    fn indicator_keys_are_unique() {
        assert_ne!(INDICATORS[0].key, INDICATORS[1].key);
    }
}
