use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use super::error::StoreError;
use crate::types::{Document, CREATED_AT, ID_FIELD, SYSTEM_FIELDS, UPDATED_AT};

/// Value assigned to a field when an inserted document omits it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    Text(&'static str),
    Flag(bool),
    Number(f64),
    EmptyObject,
    EmptyList,
}

impl FieldDefault {
    pub fn to_value(&self) -> Value {
        match self {
            FieldDefault::Text(s) => json!(s),
            FieldDefault::Flag(b) => json!(b),
            FieldDefault::Number(n) => json!(n),
            FieldDefault::EmptyObject => json!({}),
            FieldDefault::EmptyList => json!([]),
        }
    }
}

/// Typed handle to a named collection: the schema rules the store enforces on write.
/// Everything not named here is free-form.
#[derive(Debug, PartialEq)]
pub struct Collection {
    pub name: &'static str,
    pub required: &'static [&'static str],
    /// Unique keys; a key with several fields is a compound key.
    pub unique: &'static [&'static [&'static str]],
    pub defaults: &'static [(&'static str, FieldDefault)],
}

impl Collection {
    pub const fn new(name: &'static str) -> Self {
        Self { name, required: &[], unique: &[], defaults: &[] }
    }

    pub const fn required(self, required: &'static [&'static str]) -> Self {
        Self { required, ..self }
    }

    pub const fn unique(self, unique: &'static [&'static [&'static str]]) -> Self {
        Self { unique, ..self }
    }

    pub const fn defaults(self, defaults: &'static [(&'static str, FieldDefault)]) -> Self {
        Self { defaults, ..self }
    }

    /// Strip caller-supplied system fields, apply defaults, stamp identity and timestamps.
    pub fn prepare_insert(&self, mut doc: Document, now: DateTime<Utc>) -> Result<Document, StoreError> {
        for field in SYSTEM_FIELDS {
            doc.remove(*field);
        }
        for (field, default) in self.defaults {
            if !doc.contains_key(*field) {
                doc.insert(field.to_string(), default.to_value());
            }
        }
        self.key_fields_as_text(&mut doc);
        let stamp = timestamp(now);
        doc.insert(ID_FIELD.to_string(), Value::String(Uuid::new_v4().to_string()));
        doc.insert(CREATED_AT.to_string(), Value::String(stamp.clone()));
        doc.insert(UPDATED_AT.to_string(), Value::String(stamp));
        self.check_required(&doc)?;
        Ok(doc)
    }

    /// Merge top-level changes into an existing document and re-validate.
    pub fn apply_update(&self, existing: &Document, changes: Document, now: DateTime<Utc>) -> Result<Document, StoreError> {
        let doc = self.merge_changes(existing, changes, now);
        self.check_required(&doc)?;
        Ok(doc)
    }

    /// Merge without validation (bulk updates).
    pub fn merge_changes(&self, existing: &Document, changes: Document, now: DateTime<Utc>) -> Document {
        let mut doc = existing.clone();
        for (key, value) in changes {
            if SYSTEM_FIELDS.contains(&key.as_str()) {
                continue;
            }
            doc.insert(key, value);
        }
        self.key_fields_as_text(&mut doc);
        doc.insert(UPDATED_AT.to_string(), Value::String(timestamp(now)));
        doc
    }

    /// Key fields are text: scalar numbers and booleans are stored as their string form,
    /// so `123` and `"123"` name the same document.
    pub fn key_fields_as_text(&self, doc: &mut Document) {
        for field in self.unique.iter().flat_map(|key| key.iter()) {
            let text = match doc.get(*field) {
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::Bool(b)) => b.to_string(),
                _ => continue,
            };
            doc.insert(field.to_string(), Value::String(text));
        }
    }

    pub fn check_required(&self, doc: &Document) -> Result<(), StoreError> {
        let missing: Vec<&str> = self
            .required
            .iter()
            .copied()
            .filter(|field| match doc.get(*field) {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.is_empty(),
                Some(_) => false,
            })
            .collect();

        if missing.is_empty() {
            return Ok(());
        }
        let reasons: Vec<String> = missing.iter().map(|f| format!("{}: `{}` is required", f, f)).collect();
        Err(StoreError::Validation(format!("{} validation failed: {}", self.name, reasons.join(", "))))
    }

    /// Name of the unique index backing `key`.
    pub fn index_name(&self, key: &[&str]) -> String {
        format!("{}_{}_key", self.name, key.join("_"))
    }

    /// Returns the violated key when `candidate` and `other` collide on any unique key.
    /// Keys with a missing or null field never collide.
    pub fn unique_conflict(&self, candidate: &Document, other: &Document) -> Option<&'static [&'static str]> {
        self.unique.iter().copied().find(|key| {
            key.iter().all(|field| match (candidate.get(*field), other.get(*field)) {
                (Some(a), Some(b)) if !a.is_null() => a == b,
                _ => false,
            })
        })
    }

    pub fn duplicate_message(&self, key: &[&str], candidate: &Document) -> String {
        let values: Vec<String> = key
            .iter()
            .map(|field| format!("{}: {}", field, candidate.get(*field).unwrap_or(&Value::Null)))
            .collect();
        format!(
            "duplicate key error collection: {} index: {} dup key: {{ {} }}",
            self.name,
            self.index_name(key),
            values.join(", ")
        )
    }
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDGETS: Collection = Collection::new("widgets")
        .required(&["widgetId", "name"])
        .unique(&[&["widgetId"], &["owner", "slot"]])
        .defaults(&[("status", FieldDefault::Text("Active")), ("read", FieldDefault::Flag(false))]);

    fn doc(v: Value) -> Document {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn insert_applies_defaults_and_system_fields() {
        let prepared = WIDGETS
            .prepare_insert(doc(json!({ "widgetId": "W1", "name": "First", "_id": "forged" })), Utc::now())
            .unwrap();
        assert_eq!(prepared["status"], "Active");
        assert_eq!(prepared["read"], false);
        assert_ne!(prepared[ID_FIELD], "forged");
        assert!(prepared.contains_key(CREATED_AT));
        assert_eq!(prepared[CREATED_AT], prepared[UPDATED_AT]);
    }

    #[test]
    fn insert_keeps_explicit_values_over_defaults() {
        let prepared = WIDGETS
            .prepare_insert(doc(json!({ "widgetId": "W1", "name": "First", "status": "Closed" })), Utc::now())
            .unwrap();
        assert_eq!(prepared["status"], "Closed");
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let err = WIDGETS.prepare_insert(doc(json!({ "widgetId": "W1" })), Utc::now()).unwrap_err();
        match err {
            StoreError::Validation(msg) => assert!(msg.contains("name"), "{}", msg),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn update_cannot_blank_required_field_or_touch_identity() {
        let existing = WIDGETS
            .prepare_insert(doc(json!({ "widgetId": "W1", "name": "First" })), Utc::now())
            .unwrap();
        assert!(WIDGETS.apply_update(&existing, doc(json!({ "name": "" })), Utc::now()).is_err());

        let updated = WIDGETS
            .apply_update(&existing, doc(json!({ "_id": "other", "colour": "red" })), Utc::now())
            .unwrap();
        assert_eq!(updated[ID_FIELD], existing[ID_FIELD]);
        assert_eq!(updated["colour"], "red");
    }

    #[test]
    fn scalar_key_values_are_stored_as_text() {
        let prepared = WIDGETS
            .prepare_insert(doc(json!({ "widgetId": 123, "name": "First", "owner": true, "slot": 2 })), Utc::now())
            .unwrap();
        assert_eq!(prepared["widgetId"], "123");
        assert_eq!(prepared["owner"], "true");
        assert_eq!(prepared["slot"], "2");

        let updated = WIDGETS
            .apply_update(&prepared, doc(json!({ "widgetId": 7.5, "name": 42 })), Utc::now())
            .unwrap();
        assert_eq!(updated["widgetId"], "7.5");
        // only key fields are coerced
        assert_eq!(updated["name"], 42);
    }

    #[test]
    fn detects_single_and_compound_key_conflicts() {
        let a = doc(json!({ "widgetId": "W1", "owner": "o", "slot": 1 }));
        let b = doc(json!({ "widgetId": "W2", "owner": "o", "slot": 1 }));
        let c = doc(json!({ "widgetId": "W1" }));
        let d = doc(json!({ "widgetId": "W3", "owner": "o", "slot": 2 }));

        assert_eq!(WIDGETS.unique_conflict(&b, &a), Some(&["owner", "slot"][..]));
        assert_eq!(WIDGETS.unique_conflict(&c, &a), Some(&["widgetId"][..]));
        assert_eq!(WIDGETS.unique_conflict(&d, &a), None);
        assert!(WIDGETS.duplicate_message(&["widgetId"], &c).contains("widgets_widgetId_key"));
    }
}
