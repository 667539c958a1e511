use uuid::Uuid;
use validator::Validate;

use super::{decode_all, invalid};
use crate::db::models::{NewTrainingItem, TrainingItem};
use crate::db::store::{to_body, Document, DocumentStore, Filter, Patch, TRAINING_ITEMS};
use crate::db::DatabaseError;

pub struct TrainingRepository;

impl TrainingRepository {
    pub async fn create(
        store: &dyn DocumentStore,
        new_item: &NewTrainingItem,
    ) -> Result<TrainingItem, DatabaseError> {
        new_item.validate().map_err(invalid)?;
        let body = to_body(new_item)?;
        let id = store.add(TRAINING_ITEMS, body.clone()).await?;
        Document::new(id, body).into_record()
    }

    pub async fn get(
        store: &dyn DocumentStore,
        item_id: Uuid,
    ) -> Result<Option<TrainingItem>, DatabaseError> {
        store
            .get(TRAINING_ITEMS, item_id)
            .await?
            .map(Document::into_record)
            .transpose()
    }

    pub async fn list(store: &dyn DocumentStore) -> Result<Vec<TrainingItem>, DatabaseError> {
        decode_all(store.query(TRAINING_ITEMS, &Filter::all()).await?)
    }

    pub async fn record_view(store: &dyn DocumentStore, item_id: Uuid) -> Result<(), DatabaseError> {
        store
            .update(TRAINING_ITEMS, item_id, &[Patch::increment("views", 1)])
            .await
    }

    pub async fn increment_completions(
        store: &dyn DocumentStore,
        item_id: Uuid,
    ) -> Result<(), DatabaseError> {
        store
            .update(TRAINING_ITEMS, item_id, &[Patch::increment("completions", 1)])
            .await
    }

    pub async fn count(store: &dyn DocumentStore) -> Result<usize, DatabaseError> {
        Ok(store.query(TRAINING_ITEMS, &Filter::all()).await?.len())
    }
}
