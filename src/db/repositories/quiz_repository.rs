use uuid::Uuid;
use validator::Validate;

use super::{decode_all, invalid};
use crate::db::models::{NewQuizDefinition, QuizDefinition};
use crate::db::store::{to_body, Document, DocumentStore, Filter, QUIZZES};
use crate::db::DatabaseError;

pub struct QuizRepository;

impl QuizRepository {
    /// Validate and store a new quiz. Both the field rules and the
    /// question/certificate invariants are checked before anything is written.
    pub async fn create(
        store: &dyn DocumentStore,
        new_quiz: NewQuizDefinition,
    ) -> Result<QuizDefinition, DatabaseError> {
        new_quiz.validate().map_err(invalid)?;
        let quiz = new_quiz.into_definition().map_err(invalid)?;
        let id = store.add(QUIZZES, to_body(&quiz)?).await?;
        Ok(quiz.with_id(id))
    }

    pub async fn get(
        store: &dyn DocumentStore,
        quiz_id: Uuid,
    ) -> Result<Option<QuizDefinition>, DatabaseError> {
        store
            .get(QUIZZES, quiz_id)
            .await?
            .map(Document::into_record)
            .transpose()
    }

    pub async fn list(store: &dyn DocumentStore) -> Result<Vec<QuizDefinition>, DatabaseError> {
        decode_all(store.query(QUIZZES, &Filter::all()).await?)
    }

    pub async fn count(store: &dyn DocumentStore) -> Result<usize, DatabaseError> {
        Ok(store.query(QUIZZES, &Filter::all()).await?.len())
    }
}
