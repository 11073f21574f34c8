use std::cmp::Ordering;

use serde_json::Value;

use super::error::FilterError;
use super::filter::Filter;
use super::types::{FilterOrderInfo, SortDirection};
use crate::types::Document;

pub struct FilterOrder;

impl FilterOrder {
    /// ORDER BY over JSONB fields. Insertion order (`seq`) always breaks ties,
    /// so an empty spec yields insertion order.
    pub fn generate(infos: &[FilterOrderInfo]) -> Result<String, FilterError> {
        let mut parts = Vec::with_capacity(infos.len() + 1);
        for info in infos {
            Filter::validate_column(&info.column)?;
            parts.push(format!("body -> '{}' {}", info.column, info.sort.to_sql()));
        }
        parts.push("seq ASC".to_string());
        Ok(format!("ORDER BY {}", parts.join(", ")))
    }

    /// In-memory counterpart of `generate`. Callers sort stably, which keeps
    /// insertion order for ties.
    pub fn compare(infos: &[FilterOrderInfo], a: &Document, b: &Document) -> Ordering {
        for info in infos {
            let ord = compare_values(a.get(&info.column), b.get(&info.column));
            let ord = match info.sort {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

/// Total order mirroring PostgreSQL jsonb: missing < null < string < number < bool < array < object.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Less,
        (Some(_), None) => return Ordering::Greater,
        (Some(a), Some(b)) => (a, b),
    };

    match type_rank(a).cmp(&type_rank(b)) {
        Ordering::Equal => {}
        other => return other,
    }

    match (a, b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (l, r) in x.iter().zip(y.iter()) {
                let ord = compare_values(Some(l), Some(r));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::Object(x), Value::Object(y)) => x.len().cmp(&y.len()),
        _ => Ordering::Equal,
    }
}

fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::String(_) => 1,
        Value::Number(_) => 2,
        Value::Bool(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: Value) -> Document {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn empty_order_falls_back_to_insertion_order() {
        assert_eq!(FilterOrder::generate(&[]).unwrap(), "ORDER BY seq ASC");
    }

    #[test]
    fn generates_direction_with_null_placement() {
        let infos = vec![FilterOrderInfo { column: "ticker".into(), sort: SortDirection::Asc }];
        assert_eq!(
            FilterOrder::generate(&infos).unwrap(),
            "ORDER BY body -> 'ticker' ASC NULLS FIRST, seq ASC"
        );
    }

    #[test]
    fn compares_numbers_across_representations() {
        assert_eq!(compare_values(Some(&json!(1)), Some(&json!(1.0))), Ordering::Equal);
        assert_eq!(compare_values(Some(&json!(2)), Some(&json!(10.5))), Ordering::Less);
    }

    #[test]
    fn missing_sorts_lowest() {
        let infos = vec![FilterOrderInfo { column: "date".into(), sort: SortDirection::Desc }];
        let with = doc(json!({ "date": "2026-02-01" }));
        let without = doc(json!({}));
        assert_eq!(FilterOrder::compare(&infos, &with, &without), Ordering::Less);
    }
}
