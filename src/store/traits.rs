use async_trait::async_trait;

use super::error::StoreError;
use super::schema::Collection;
use crate::filter::Filter;
use crate::types::Document;

/// Persistence seam for every handler. Implementations enforce the collection
/// schema (required fields, unique keys, system fields) on each write.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Documents matching `filter`, ordered by its sort spec then insertion order.
    async fn find(&self, collection: &Collection, filter: &Filter) -> Result<Vec<Document>, StoreError>;

    async fn find_one(&self, collection: &Collection, filter: &Filter) -> Result<Option<Document>, StoreError> {
        let limited = filter.clone().limit(1);
        Ok(self.find(collection, &limited).await?.into_iter().next())
    }

    async fn count(&self, collection: &Collection, filter: &Filter) -> Result<u64, StoreError>;

    /// Sum of a numeric field over matching documents. Non-numeric values are skipped; 0 when none match.
    async fn sum(&self, collection: &Collection, field: &str, filter: &Filter) -> Result<f64, StoreError>;

    /// Most recently inserted document.
    async fn latest(&self, collection: &Collection) -> Result<Option<Document>, StoreError>;

    async fn insert(&self, collection: &Collection, doc: Document) -> Result<Document, StoreError>;

    /// Merge `changes` into the first match and return the result; `None` when nothing matched.
    async fn update_one(
        &self,
        collection: &Collection,
        filter: &Filter,
        changes: Document,
    ) -> Result<Option<Document>, StoreError>;

    /// Merge `changes` into every match. Returns the number of documents touched.
    async fn update_many(&self, collection: &Collection, filter: &Filter, changes: Document) -> Result<u64, StoreError>;

    /// Remove the first match and return it.
    async fn delete_one(&self, collection: &Collection, filter: &Filter) -> Result<Option<Document>, StoreError>;

    /// Remove every document in the collection.
    async fn clear(&self, collection: &Collection) -> Result<u64, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
