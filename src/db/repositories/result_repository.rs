use uuid::Uuid;

use super::decode_all;
use crate::db::models::{NewQuizAttemptResult, QuizAttemptResult};
use crate::db::store::{to_body, Document, DocumentStore, Filter, QUIZ_RESULTS};
use crate::db::DatabaseError;

pub struct ResultRepository;

impl ResultRepository {
    pub async fn create(
        store: &dyn DocumentStore,
        result: &NewQuizAttemptResult,
    ) -> Result<QuizAttemptResult, DatabaseError> {
        let body = to_body(result)?;
        let id = store.add(QUIZ_RESULTS, body.clone()).await?;
        Document::new(id, body).into_record()
    }

    /// The employee's results, newest first.
    pub async fn list_for_employee(
        store: &dyn DocumentStore,
        employee_id: Uuid,
    ) -> Result<Vec<QuizAttemptResult>, DatabaseError> {
        let filter = Filter::all().eq("employeeId", employee_id.to_string());
        let mut results: Vec<QuizAttemptResult> =
            decode_all(store.query(QUIZ_RESULTS, &filter).await?)?;
        results.reverse();
        results.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(results)
    }
}
