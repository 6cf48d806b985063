//! Shared domain types.
//!
//! Everything here is built fresh per run and dropped after the snapshot is
//! serialized. The serialized field names (`valor`, `fecha_iso`, ...) are the
//! contract with the dashboard that reads the snapshot file.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// ISO date format used in the source records and in `fecha_iso`.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Display date format used in `fecha_display`.
pub const DISPLAY_DATE_FORMAT: &str = "%d / %m / %Y";

/// Format of `generated_at_utc`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A parsed indicator value.
///
/// Whole numbers are kept as integers so `462` serializes as `462`, not `462.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    /// Build from a float, collapsing integral values. Non-finite input is rejected.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
            Some(Numeric::Int(value as i64))
        } else {
            Some(Numeric::Float(value))
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Numeric::Int(v) => v as f64,
            Numeric::Float(v) => v,
        }
    }
}

impl std::fmt::Display for Numeric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Numeric::Int(v) => write!(f, "{v}"),
            Numeric::Float(v) => write!(f, "{v}"),
        }
    }
}

/// One (date, value) point of an indicator series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatedValue {
    pub date: NaiveDate,
    pub value: Numeric,
}

/// A dated value rendered for output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub valor: Numeric,
    pub fecha_iso: String,
    pub fecha_display: String,
}

impl From<&DatedValue> for Observation {
    fn from(point: &DatedValue) -> Self {
        Self {
            valor: point.value,
            fecha_iso: point.date.format(ISO_DATE_FORMAT).to_string(),
            fecha_display: point.date.format(DISPLAY_DATE_FORMAT).to_string(),
        }
    }
}

/// Latest value plus the trailing window it was taken from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub latest: Observation,
    /// Date-ascending, non-empty, at most `limit` entries.
    #[serde(rename = "series_5d")]
    pub window: Vec<Observation>,
}

/// Reduced form for sources that only contribute a single value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestValue {
    pub latest: Observation,
}

/// What a snapshot holds for one indicator key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndicatorValue {
    Series(ExtractionResult),
    Latest(LatestValue),
}

impl IndicatorValue {
    pub fn latest(&self) -> &Observation {
        match self {
            IndicatorValue::Series(result) => &result.latest,
            IndicatorValue::Latest(value) => &value.latest,
        }
    }

    pub fn window(&self) -> &[Observation] {
        match self {
            IndicatorValue::Series(result) => &result.window,
            IndicatorValue::Latest(_) => &[],
        }
    }
}

/// The file handed to the dashboard.
///
/// Serialized as one flat JSON object: each indicator under its key, then the
/// `source_*` provenance entries, then `generated_at_utc`. See `io::snapshot`.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Indicator key -> value, in output order.
    pub indicators: Vec<(String, IndicatorValue)>,
    /// Provenance key (`source_*`) -> URL or identifier.
    pub sources: Vec<(String, String)>,
    pub generated_at_utc: String,
}

impl Snapshot {
    pub fn get(&self, key: &str) -> Option<&IndicatorValue> {
        self.indicators
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn source(&self, key: &str) -> Option<&str> {
        self.sources
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Matcher over a record's indicator or measure text.
pub type TextMatcher = fn(&str) -> bool;

/// One indicator to extract from the primary source.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorSpec {
    /// Output key in the snapshot (e.g. `riesgo_pais`).
    pub key: &'static str,
    /// Human-readable label for logs and the terminal summary.
    pub label: &'static str,
    pub indicator: TextMatcher,
    pub measure: Option<TextMatcher>,
}

/// Optional crude oil source settings.
#[derive(Debug, Clone)]
pub struct OilConfig {
    pub api_key: String,
    pub series_id: String,
    /// FRED observations endpoint.
    pub base_url: String,
}

/// A full run's configuration, resolved from env (`.env`) and CLI flags.
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    pub source_url: String,
    pub out_path: PathBuf,
    pub limit: usize,
    pub timeout: Duration,
    /// `None` when oil is disabled or `FRED_API_KEY` is not set.
    pub oil: Option<OilConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_collapses_whole_floats() {
        assert_eq!(Numeric::from_f64(462.0), Some(Numeric::Int(462)));
        assert_eq!(Numeric::from_f64(4.8), Some(Numeric::Float(4.8)));
        assert_eq!(Numeric::from_f64(f64::NAN), None);
        assert_eq!(Numeric::from_f64(f64::INFINITY), None);
    }

    #[test]
    fn numeric_serializes_without_trailing_zero() {
        assert_eq!(serde_json::to_string(&Numeric::Int(462)).unwrap(), "462");
        assert_eq!(serde_json::to_string(&Numeric::Float(4611.05)).unwrap(), "4611.05");
    }

    #[test]
    fn observation_renders_both_date_forms() {
        let point = DatedValue {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            value: Numeric::Int(1960),
        };
        let obs = Observation::from(&point);
        assert_eq!(obs.fecha_iso, "2024-01-02");
        assert_eq!(obs.fecha_display, "02 / 01 / 2024");
        assert_eq!(obs.valor, Numeric::Int(1960));
    }
}
