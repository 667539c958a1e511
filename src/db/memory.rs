use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{Document, DocumentStore, Filter, Patch};
use super::DatabaseError;

/// Process-local document store used for development and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: Uuid) -> Result<Option<Document>, DatabaseError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id))
            .cloned())
    }

    async fn query(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<Document>, DatabaseError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| filter.matches(&doc.body))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn add(&self, collection: &str, record: Value) -> Result<Uuid, DatabaseError> {
        if !record.is_object() {
            return Err(DatabaseError::InvalidInput(
                "records must be JSON objects".to_string(),
            ));
        }
        let id = Uuid::new_v4();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(Document::new(id, record));
        Ok(id)
    }

    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        patches: &[Patch],
    ) -> Result<(), DatabaseError> {
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
            .ok_or(DatabaseError::NotFound)?;

        // Patch a copy so a failing patch leaves the document untouched.
        let mut body = doc.body.as_object().cloned().unwrap_or_default();
        for patch in patches {
            patch.apply(&mut body)?;
        }
        doc.body = Value::Object(body);
        Ok(())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
