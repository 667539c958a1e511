use uuid::Uuid;
use validator::Validate;

use super::invalid;
use crate::db::models::{EmployeeProfile, NewEmployeeProfile};
use crate::db::store::{to_body, Document, DocumentStore, Filter, Patch, EMPLOYEES};
use crate::db::DatabaseError;

pub struct EmployeeRepository;

impl EmployeeRepository {
    pub async fn create(
        store: &dyn DocumentStore,
        profile: &NewEmployeeProfile,
    ) -> Result<EmployeeProfile, DatabaseError> {
        profile.validate().map_err(invalid)?;
        let body = to_body(profile)?;
        let id = store.add(EMPLOYEES, body.clone()).await?;
        Document::new(id, body).into_record()
    }

    pub async fn get(
        store: &dyn DocumentStore,
        employee_id: Uuid,
    ) -> Result<Option<EmployeeProfile>, DatabaseError> {
        store
            .get(EMPLOYEES, employee_id)
            .await?
            .map(Document::into_record)
            .transpose()
    }

    /// Append-if-absent: marking the same item twice leaves one entry.
    pub async fn add_completed_item(
        store: &dyn DocumentStore,
        employee_id: Uuid,
        item_id: Uuid,
    ) -> Result<(), DatabaseError> {
        store
            .update(
                EMPLOYEES,
                employee_id,
                &[Patch::array_union("completedItemIds", item_id.to_string())],
            )
            .await
    }

    pub async fn count(store: &dyn DocumentStore) -> Result<usize, DatabaseError> {
        Ok(store.query(EMPLOYEES, &Filter::all()).await?.len())
    }
}
