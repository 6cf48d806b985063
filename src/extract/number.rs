//! Number parsing for values that may use European notation.

use serde_json::Value;

use crate::domain::Numeric;

/// Parse a record value into a number.
///
/// Accepts JSON strings and numbers. A string containing `,` is read as
/// European notation: every `.` is a thousands separator and `,` is the
/// decimal point (`"4.611,05"` -> `4611.05`). Anything unparsable yields
/// `None` so the caller can skip the record.
pub fn parse_number(value: &Value) -> Option<Numeric> {
    match value {
        Value::String(s) => parse_number_str(s),
        Value::Number(n) => n.as_f64().and_then(Numeric::from_f64),
        _ => None,
    }
}

/// String form of [`parse_number`].
pub fn parse_number_str(raw: &str) -> Option<Numeric> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let parsed = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".").parse::<f64>()
    } else {
        trimmed.parse::<f64>()
    };

    parsed.ok().and_then(Numeric::from_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_integer_stays_integer() {
        assert_eq!(parse_number(&json!("462")), Some(Numeric::Int(462)));
    }

    #[test]
    fn european_thousands_and_decimal() {
        assert_eq!(parse_number(&json!("4.611,05")), Some(Numeric::Float(4611.05)));
        assert_eq!(parse_number(&json!("4,80")), Some(Numeric::Float(4.8)));
        assert_eq!(parse_number(&json!("1.950,50")), Some(Numeric::Float(1950.5)));
    }

    #[test]
    fn european_whole_number_collapses() {
        assert_eq!(parse_number(&json!("1.000,00")), Some(Numeric::Int(1000)));
    }

    #[test]
    fn plain_decimal() {
        assert_eq!(parse_number(&json!(" 72.35 ")), Some(Numeric::Float(72.35)));
    }

    #[test]
    fn numeric_json_values() {
        assert_eq!(parse_number(&json!(1960)), Some(Numeric::Int(1960)));
        assert_eq!(parse_number(&json!(1960.0)), Some(Numeric::Int(1960)));
        assert_eq!(parse_number(&json!(4.25)), Some(Numeric::Float(4.25)));
    }

    #[test]
    fn garbage_is_absent() {
        assert_eq!(parse_number(&json!("abc")), None);
        assert_eq!(parse_number(&json!("")), None);
        assert_eq!(parse_number(&json!("   ")), None);
        assert_eq!(parse_number(&json!("NaN")), None);
        assert_eq!(parse_number(&json!(null)), None);
        assert_eq!(parse_number(&json!(true)), None);
        assert_eq!(parse_number(&json!(["1"])), None);
    }

    #[test]
    fn comma_is_always_decimal() {
        // US-style thousands are not distinguished from European decimals.
        assert_eq!(parse_number(&json!("1,234")), Some(Numeric::Float(1.234)));
    }
}
