//! Find the record list inside the source document.
//!
//! The envelope is not stable: sometimes a bare list, sometimes nested under
//! keys that change between publications. We search for the first list whose
//! first element looks like a record.

use serde_json::Value;

use super::{FIELD_DATE, FIELD_INDICATOR, FIELD_VALUE};

/// Depth-first search for a list of records carrying `Indicador`, `Fecha` and `Valor`.
///
/// Lists are checked before their elements are descended into; object values
/// are visited in document order.
pub fn find_records(document: &Value) -> Option<&[Value]> {
    match document {
        Value::Array(items) => {
            if items.first().is_some_and(is_record) {
                return Some(items.as_slice());
            }
            items.iter().find_map(find_records)
        }
        Value::Object(map) => map.values().find_map(find_records),
        _ => None,
    }
}

fn is_record(value: &Value) -> bool {
    value.as_object().is_some_and(|map| {
        [FIELD_INDICATOR, FIELD_DATE, FIELD_VALUE]
            .iter()
            .all(|key| map.contains_key(*key))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(indicator: &str) -> Value {
        json!({"Indicador": indicator, "Fecha": "2024-01-01", "Valor": "1"})
    }

    #[test]
    fn bare_list() {
        let doc = json!([record("a"), record("b")]);
        let found = find_records(&doc).unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn nested_three_levels_under_arbitrary_keys() {
        let doc = json!({
            "meta": {"version": 3},
            "payload": {
                "x": [1, 2, 3],
                "datos": {"items": [record("riesgo"), record("oro"), record("otro")]}
            }
        });
        let found = find_records(&doc).unwrap();
        assert_eq!(found.len(), 3);
        assert_eq!(found[1]["Indicador"], "oro");
    }

    #[test]
    fn list_nested_in_list() {
        let doc = json!([[1, 2], [record("a")]]);
        assert_eq!(find_records(&doc).unwrap().len(), 1);
    }

    #[test]
    fn extra_keys_still_qualify() {
        let doc = json!({"d": [{"Indicador": "x", "Fecha": "f", "Valor": 1, "Medida": "m"}]});
        assert!(find_records(&doc).is_some());
    }

    #[test]
    fn first_match_in_document_order_wins() {
        let doc = json!({"first": [record("one")], "second": [record("two"), record("three")]});
        let found = find_records(&doc).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["Indicador"], "one");
    }

    #[test]
    fn absent_when_required_keys_missing() {
        let doc = json!({"data": [{"Indicador": "x", "Fecha": "2024-01-01"}], "n": 5});
        assert!(find_records(&doc).is_none());
        assert!(find_records(&json!([])).is_none());
        assert!(find_records(&json!("text")).is_none());
    }
}
