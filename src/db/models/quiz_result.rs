use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::Question;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptStatus {
    Passed,
    Failed,
}

impl AttemptStatus {
    pub fn is_passed(self) -> bool {
        self == AttemptStatus::Passed
    }
}

/// The persisted outcome of one submission. Never updated after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttemptResult {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub quiz_id: Uuid,
    pub title: String,
    pub score_percent: u8,
    pub status: AttemptStatus,
    pub selected_answers: Vec<usize>,
    /// Copy of the quiz questions as they were when the attempt was submitted.
    pub questions_snapshot: Vec<Question>,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuizAttemptResult {
    pub employee_id: Uuid,
    pub quiz_id: Uuid,
    pub title: String,
    pub score_percent: u8,
    pub status: AttemptStatus,
    pub selected_answers: Vec<usize>,
    pub questions_snapshot: Vec<Question>,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
}
