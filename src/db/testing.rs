//! Fixtures shared by unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use super::models::{
    ContentType, EmployeeProfile, NewEmployeeProfile, NewQuizDefinition, NewTrainingItem,
    QuestionDocument, QuizDefinition, TrainingItem, ALL_DEPARTMENTS,
};
use super::repositories::{EmployeeRepository, QuizRepository, TrainingRepository};
use super::store::{Document, DocumentStore, Filter, Patch};
use super::{DatabaseError, MemoryStore};

/// Wraps a [`MemoryStore`] and rejects every insert into one collection.
pub struct FailingStore {
    pub inner: MemoryStore,
    pub failing_collection: &'static str,
}

impl FailingStore {
    pub fn new(failing_collection: &'static str) -> Self {
        Self {
            inner: MemoryStore::new(),
            failing_collection,
        }
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn get(&self, collection: &str, id: Uuid) -> Result<Option<Document>, DatabaseError> {
        self.inner.get(collection, id).await
    }

    async fn query(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<Document>, DatabaseError> {
        self.inner.query(collection, filter).await
    }

    async fn add(&self, collection: &str, record: Value) -> Result<Uuid, DatabaseError> {
        if collection == self.failing_collection {
            return Err(DatabaseError::Unavailable(format!(
                "writes to {} are failing",
                collection
            )));
        }
        self.inner.add(collection, record).await
    }

    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        patches: &[Patch],
    ) -> Result<(), DatabaseError> {
        self.inner.update(collection, id, patches).await
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

pub fn memory_store() -> Arc<dyn DocumentStore> {
    Arc::new(MemoryStore::new())
}

pub async fn seed_employee(store: &dyn DocumentStore, department: &str) -> EmployeeProfile {
    EmployeeRepository::create(
        store,
        &NewEmployeeProfile {
            first_name: "Ayla".to_string(),
            surname: "Demir".to_string(),
            department: department.to_string(),
            completed_item_ids: vec![],
        },
    )
    .await
    .unwrap()
}

pub async fn seed_training(store: &dyn DocumentStore, department: &str) -> TrainingItem {
    TrainingRepository::create(
        store,
        &NewTrainingItem {
            title: "Brake Systems".to_string(),
            description: Some("Disc and drum brakes".to_string()),
            content_type: ContentType::Video,
            department: department.to_string(),
            file_url: Some("https://cdn.example.com/brakes.mp4".to_string()),
            created_at: OffsetDateTime::now_utc(),
        },
    )
    .await
    .unwrap()
}

/// Four questions whose correct answers are `[0, 1, 2, 3]`.
pub fn new_quiz(passing_score_percent: u32, certificate_title: Option<&str>) -> NewQuizDefinition {
    NewQuizDefinition {
        title: "Brake Safety".to_string(),
        description: None,
        questions: (0..4)
            .map(|i| QuestionDocument {
                question_text: format!("Question {}", i + 1),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct_answer_index: i,
            })
            .collect(),
        passing_score_percent,
        time_limit_minutes: Some(20),
        related_training_item_id: None,
        department: ALL_DEPARTMENTS.to_string(),
        grants_certificate: certificate_title.is_some(),
        certificate_title: certificate_title.map(str::to_string),
    }
}

pub async fn seed_quiz(store: &dyn DocumentStore, new_quiz: NewQuizDefinition) -> QuizDefinition {
    QuizRepository::create(store, new_quiz).await.unwrap()
}
