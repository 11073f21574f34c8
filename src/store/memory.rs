use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;

use super::error::StoreError;
use super::schema::Collection;
use super::traits::DocumentStore;
use crate::filter::filter_order::FilterOrder;
use crate::filter::Filter;
use crate::types::Document;

#[derive(Debug, Clone)]
struct StoredDocument {
    seq: u64,
    body: Document,
}

/// Process-local store used by tests and `DATABASE_BACKEND=memory`.
/// Collections are insertion-ordered vectors guarded by a single lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<StoredDocument>>>,
    next_seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unique(
        collection: &Collection,
        docs: &[StoredDocument],
        candidate: &Document,
        skip_seq: Option<u64>,
    ) -> Result<(), StoreError> {
        for other in docs.iter().filter(|d| Some(d.seq) != skip_seq) {
            if let Some(key) = collection.unique_conflict(candidate, &other.body) {
                return Err(StoreError::Duplicate(collection.duplicate_message(key, candidate)));
            }
        }
        Ok(())
    }

    fn select<'a>(docs: &'a [StoredDocument], filter: &Filter) -> Vec<&'a StoredDocument> {
        let mut matched: Vec<&StoredDocument> = docs.iter().filter(|d| filter.matches(&d.body)).collect();
        // stable sort keeps insertion order on ties
        matched.sort_by(|a, b| FilterOrder::compare(filter.order(), &a.body, &b.body));
        if let Some(limit) = filter.limit_value() {
            matched.truncate(limit as usize);
        }
        matched
    }

    fn first_match(docs: &[StoredDocument], filter: &Filter) -> Option<usize> {
        let seq = Self::select(docs, filter).first().map(|d| d.seq)?;
        docs.iter().position(|d| d.seq == seq)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: &Collection, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let docs = collections.get(collection.name).map(Vec::as_slice).unwrap_or(&[]);
        Ok(Self::select(docs, filter).into_iter().map(|d| d.body.clone()).collect())
    }

    async fn count(&self, collection: &Collection, filter: &Filter) -> Result<u64, StoreError> {
        let collections = self.collections.read().await;
        let count = collections
            .get(collection.name)
            .map(|docs| docs.iter().filter(|d| filter.matches(&d.body)).count())
            .unwrap_or(0);
        Ok(count as u64)
    }

    async fn sum(&self, collection: &Collection, field: &str, filter: &Filter) -> Result<f64, StoreError> {
        Filter::validate_column(field)?;
        let collections = self.collections.read().await;
        let total = collections
            .get(collection.name)
            .map(|docs| {
                docs.iter()
                    .filter(|d| filter.matches(&d.body))
                    .filter_map(|d| d.body.get(field).and_then(Value::as_f64))
                    .sum()
            })
            .unwrap_or(0.0);
        Ok(total)
    }

    async fn latest(&self, collection: &Collection) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection.name)
            .and_then(|docs| docs.last())
            .map(|d| d.body.clone()))
    }

    async fn insert(&self, collection: &Collection, doc: Document) -> Result<Document, StoreError> {
        let prepared = collection.prepare_insert(doc, Utc::now())?;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.name.to_string()).or_default();
        Self::check_unique(collection, docs, &prepared, None)?;

        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        docs.push(StoredDocument { seq, body: prepared.clone() });
        Ok(prepared)
    }

    async fn update_one(
        &self,
        collection: &Collection,
        filter: &Filter,
        changes: Document,
    ) -> Result<Option<Document>, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection.name) else {
            return Ok(None);
        };
        let Some(index) = Self::first_match(docs, filter) else {
            return Ok(None);
        };

        let updated = collection.apply_update(&docs[index].body, changes, Utc::now())?;
        Self::check_unique(collection, docs, &updated, Some(docs[index].seq))?;
        docs[index].body = updated.clone();
        Ok(Some(updated))
    }

    async fn update_many(&self, collection: &Collection, filter: &Filter, changes: Document) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection.name) else {
            return Ok(0);
        };

        let now = Utc::now();
        let mut touched = 0;
        for doc in docs.iter_mut().filter(|d| filter.matches(&d.body)) {
            doc.body = collection.merge_changes(&doc.body, changes.clone(), now);
            touched += 1;
        }
        Ok(touched)
    }

    async fn delete_one(&self, collection: &Collection, filter: &Filter) -> Result<Option<Document>, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection.name) else {
            return Ok(None);
        };
        Ok(Self::first_match(docs, filter).map(|index| docs.remove(index).body))
    }

    async fn clear(&self, collection: &Collection) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        Ok(collections.remove(collection.name).map(|docs| docs.len() as u64).unwrap_or(0))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
