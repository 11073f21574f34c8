use std::cmp::Ordering;

use serde_json::Value;

use super::filter_order::compare_values;
use super::types::{Condition, FilterOp, FilterWhereInfo};
use crate::types::Document;

/// Evaluate a condition tree against a document, with the same semantics the
/// SQL compiler produces for PostgreSQL.
pub fn matches(condition: &Condition, doc: &Document) -> bool {
    match condition {
        Condition::Field(info) => matches_field(info, doc),
        Condition::And(parts) => parts.iter().all(|c| matches(c, doc)),
        Condition::Or(parts) => parts.iter().any(|c| matches(c, doc)),
        Condition::Not(inner) => !matches(inner, doc),
    }
}

fn matches_field(info: &FilterWhereInfo, doc: &Document) -> bool {
    let actual = doc.get(&info.column);
    match info.operator {
        FilterOp::Eq => values_equal(actual, &info.data),
        FilterOp::Ne => !values_equal(actual, &info.data),
        FilterOp::In => match &info.data {
            Value::Array(values) => values.iter().any(|v| values_equal(actual, v)),
            _ => false,
        },
        FilterOp::NIn => match &info.data {
            Value::Array(values) => !values.iter().any(|v| values_equal(actual, v)),
            _ => false,
        },
        FilterOp::Gt => ordered(actual, &info.data, |o| o == Ordering::Greater),
        FilterOp::Gte => ordered(actual, &info.data, |o| o != Ordering::Less),
        FilterOp::Lt => ordered(actual, &info.data, |o| o == Ordering::Less),
        FilterOp::Lte => ordered(actual, &info.data, |o| o != Ordering::Greater),
        FilterOp::Exists => {
            let present = !matches!(actual, None | Some(Value::Null));
            present == info.data.as_bool().unwrap_or(true)
        }
    }
}

/// Missing and explicit null are equal to a null operand. Numbers compare by value.
fn values_equal(actual: Option<&Value>, expected: &Value) -> bool {
    match (actual, expected) {
        (None, Value::Null) | (Some(Value::Null), Value::Null) => true,
        (None, _) => false,
        (Some(Value::Number(a)), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Some(a), b) => a == b,
    }
}

fn ordered(actual: Option<&Value>, expected: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    match actual {
        Some(a) if std::mem::discriminant(a) == std::mem::discriminant(expected) => {
            accept(compare_values(Some(a), Some(expected)))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;
    use serde_json::json;

    fn doc(v: Value) -> Document {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn in_matches_listed_statuses_only() {
        let filter = Filter::parse(&json!({ "status": { "$in": ["Submitted", "Approved", "Executed"] } })).unwrap();
        assert!(filter.matches(&doc(json!({ "status": "Submitted" }))));
        assert!(filter.matches(&doc(json!({ "status": "Approved" }))));
        assert!(!filter.matches(&doc(json!({ "status": "Settled" }))));
        assert!(!filter.matches(&doc(json!({}))));
    }

    #[test]
    fn ne_includes_documents_without_the_field() {
        let filter = Filter::parse(&json!({ "status": { "$ne": "Resolved" } })).unwrap();
        assert!(filter.matches(&doc(json!({ "status": "Open" }))));
        assert!(filter.matches(&doc(json!({}))));
        assert!(!filter.matches(&doc(json!({ "status": "Resolved" }))));
    }

    #[test]
    fn range_operators_ignore_other_types() {
        let filter = Filter::parse(&json!({ "aum": { "$gt": 100 } })).unwrap();
        assert!(filter.matches(&doc(json!({ "aum": 150.5 }))));
        assert!(!filter.matches(&doc(json!({ "aum": 100 }))));
        assert!(!filter.matches(&doc(json!({ "aum": "999" }))));
    }

    #[test]
    fn logical_operators_combine() {
        let filter = Filter::parse(&json!({
            "$or": [ { "status": "Open" }, { "$not": { "priority": "Low" } } ]
        }))
        .unwrap();
        assert!(filter.matches(&doc(json!({ "status": "Open", "priority": "Low" }))));
        assert!(filter.matches(&doc(json!({ "status": "Closed", "priority": "High" }))));
        assert!(!filter.matches(&doc(json!({ "status": "Closed", "priority": "Low" }))));
    }

    #[test]
    fn exists_and_null_equality() {
        let exists = Filter::parse(&json!({ "approver": { "$exists": true } })).unwrap();
        assert!(exists.matches(&doc(json!({ "approver": "EN" }))));
        assert!(!exists.matches(&doc(json!({ "approver": null }))));

        let is_null = Filter::parse(&json!({ "approver": null })).unwrap();
        assert!(is_null.matches(&doc(json!({}))));
        assert!(!is_null.matches(&doc(json!({ "approver": "EN" }))));
    }
}
