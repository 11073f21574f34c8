use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use super::registry::ResourceDescriptor;
use crate::filter::{Condition, Filter};
use crate::store::{DocumentStore, StoreError};
use crate::types::Document;

#[derive(Debug, Error)]
pub enum CrudError {
    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The five generic operations every registered resource supports.
#[async_trait]
pub trait Resource: Send + Sync {
    async fn list(&self) -> Result<Vec<Document>, CrudError>;
    async fn get_one(&self, id: &str) -> Result<Document, CrudError>;
    async fn create(&self, payload: Document) -> Result<Document, CrudError>;
    async fn update(&self, id: &str, payload: Document) -> Result<Document, CrudError>;
    async fn delete(&self, id: &str) -> Result<(), CrudError>;
}

/// `Resource` over a descriptor and a document store.
pub struct StoredResource {
    descriptor: Arc<ResourceDescriptor>,
    store: Arc<dyn DocumentStore>,
}

impl StoredResource {
    pub fn new(descriptor: Arc<ResourceDescriptor>, store: Arc<dyn DocumentStore>) -> Self {
        Self { descriptor, store }
    }

    pub fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }

    fn by_id(&self, id: &str) -> Filter {
        Filter::matching(Condition::eq(self.descriptor.id_field, id))
    }

    fn elide(&self, mut doc: Document) -> Document {
        for field in self.descriptor.hidden_fields {
            doc.remove(*field);
        }
        doc
    }
}

#[async_trait]
impl Resource for StoredResource {
    async fn list(&self) -> Result<Vec<Document>, CrudError> {
        let filter = Filter::all().sorted(self.descriptor.default_sort);
        let docs = self.store.find(self.descriptor.collection, &filter).await?;
        Ok(docs.into_iter().map(|d| self.elide(d)).collect())
    }

    async fn get_one(&self, id: &str) -> Result<Document, CrudError> {
        self.store
            .find_one(self.descriptor.collection, &self.by_id(id))
            .await?
            .map(|d| self.elide(d))
            .ok_or(CrudError::NotFound)
    }

    async fn create(&self, payload: Document) -> Result<Document, CrudError> {
        let created = self.store.insert(self.descriptor.collection, payload).await?;
        Ok(self.elide(created))
    }

    async fn update(&self, id: &str, mut payload: Document) -> Result<Document, CrudError> {
        // Identity comes from the path; hidden fields are not writable here
        payload.remove(self.descriptor.id_field);
        for field in self.descriptor.hidden_fields {
            payload.remove(*field);
        }

        self.store
            .update_one(self.descriptor.collection, &self.by_id(id), payload)
            .await?
            .map(|d| self.elide(d))
            .ok_or(CrudError::NotFound)
    }

    async fn delete(&self, id: &str) -> Result<(), CrudError> {
        self.store
            .delete_one(self.descriptor.collection, &self.by_id(id))
            .await?
            .map(|_| ())
            .ok_or(CrudError::NotFound)
    }
}
