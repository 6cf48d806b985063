//! FRED API integration for the crude oil spot price.
//!
//! Optional: the snapshot only carries `petroleo` when `FRED_API_KEY` is set.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::info;

use crate::domain::{DatedValue, ISO_DATE_FORMAT, LatestValue, Numeric, Observation};
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";
/// A handful of observations is enough to step over trailing holidays (`"."`).
const OBS_LIMIT: usize = 10;

/// WTI crude, USD per barrel, daily.
pub const DEFAULT_OIL_SERIES: &str = "DCOILWTICO";

pub struct FredClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FredClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at another observations endpoint (mirror, proxy).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Public page for a series; used as provenance so the API key never lands in output.
    pub fn series_url(series_id: &str) -> String {
        format!("https://fred.stlouisfed.org/series/{series_id}")
    }

    /// Latest observation of `series_id` that carries a value.
    pub fn fetch_latest(&self, series_id: &str) -> Result<LatestValue, AppError> {
        info!(series_id, "fetching FRED series");

        let limit = OBS_LIMIT.to_string();
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("series_id", series_id),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
                ("sort_order", "desc"),
                ("limit", limit.as_str()),
            ])
            .send()
            // The request URL carries the API key; keep it out of error text.
            .map_err(|e| AppError::new(4, format!("FRED request failed: {}", e.without_url())))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("FRED request failed with status {}.", resp.status()),
            ));
        }

        let body: ObservationsResponse = resp
            .json()
            .map_err(|e| AppError::new(4, format!("Failed to parse FRED response: {}", e.without_url())))?;

        let latest = latest_observation(&body.observations)
            .ok_or_else(|| AppError::new(3, format!("No usable observations for FRED series {series_id}.")))?;

        Ok(LatestValue {
            latest: Observation::from(&latest),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    observations: Vec<FredObservation>,
}

#[derive(Debug, Deserialize)]
struct FredObservation {
    date: String,
    value: String,
}

/// Most recent observation with a parsable date and value.
fn latest_observation(observations: &[FredObservation]) -> Option<DatedValue> {
    observations
        .iter()
        .filter_map(|obs| {
            let value = parse_value(&obs.value)?;
            let date = NaiveDate::parse_from_str(obs.date.trim(), ISO_DATE_FORMAT).ok()?;
            Some(DatedValue {
                date,
                value: Numeric::from_f64(value)?,
            })
        })
        .max_by_key(|p| p.date)
}

/// FRED marks missing values with `"."`.
fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() {
        Some(v)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(date: &str, value: &str) -> FredObservation {
        FredObservation {
            date: date.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn skips_missing_marker() {
        let observations = vec![obs("2024-12-25", "."), obs("2024-12-24", "70.10"), obs("2024-12-23", "69.24")];
        let latest = latest_observation(&observations).unwrap();
        assert_eq!(latest.date, NaiveDate::from_ymd_opt(2024, 12, 24).unwrap());
        assert_eq!(latest.value, Numeric::Float(70.10));
    }

    #[test]
    fn order_independent() {
        let observations = vec![obs("2024-12-20", "68"), obs("2024-12-24", "70.5"), obs("bad", "71")];
        let latest = latest_observation(&observations).unwrap();
        assert_eq!(latest.date, NaiveDate::from_ymd_opt(2024, 12, 24).unwrap());
    }

    #[test]
    fn nothing_usable() {
        assert!(latest_observation(&[obs("2024-12-25", ".")]).is_none());
        assert!(latest_observation(&[]).is_none());
    }

    #[test]
    fn parses_response_body() {
        let body = r#"{"realtime_start":"2024-12-26","observations":[{"realtime_start":"2024-12-26","date":"2024-12-24","value":"70.10"}]}"#;
        let parsed: ObservationsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.observations.len(), 1);
        assert_eq!(parsed.observations[0].value, "70.10");
    }

    #[test]
    fn request_errors_do_not_leak_api_key() {
        let key = "SUPERSECRETKEY123";
        let client = FredClient::new(key, Duration::from_millis(500))
            .unwrap()
            .with_base_url("http://127.0.0.1:9/fred/series/observations");

        let err = client.fetch_latest(DEFAULT_OIL_SERIES).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.message().starts_with("FRED request failed"));
        assert!(!err.message().contains(key), "key leaked: {}", err.message());
    }

    #[test]
    fn provenance_url_has_no_key() {
        assert_eq!(
            FredClient::series_url("DCOILWTICO"),
            "https://fred.stlouisfed.org/series/DCOILWTICO"
        );
    }
}
