use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::models::{Certificate, QuizAttemptResult, QuizDefinition};
use crate::engine::{Eligibility, QuizListing, SubmissionOutcome};
use crate::error::AppResult;
use crate::session::EmployeeSession;

/// A question as shown to the employee, without its answer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub question_text: String,
    pub options: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizView {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub question_count: usize,
    pub passing_score_percent: u8,
    pub time_limit_minutes: Option<u32>,
    pub related_training_item_id: Option<Uuid>,
    pub department: String,
    pub certificate_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<QuestionView>>,
}

impl QuizView {
    fn summary(quiz: &QuizDefinition) -> Self {
        Self {
            id: quiz.id(),
            title: quiz.title().to_string(),
            description: quiz.description().map(str::to_string),
            question_count: quiz.question_count(),
            passing_score_percent: quiz.passing_score_percent(),
            time_limit_minutes: quiz.time_limit_minutes(),
            related_training_item_id: quiz.related_training_item_id(),
            department: quiz.department().to_string(),
            certificate_title: quiz.certificate().title().map(str::to_string),
            questions: None,
        }
    }

    fn with_questions(quiz: &QuizDefinition) -> Self {
        let questions = quiz
            .questions()
            .iter()
            .map(|question| QuestionView {
                question_text: question.text().to_string(),
                options: question.options().to_vec(),
            })
            .collect();
        Self {
            questions: Some(questions),
            ..Self::summary(quiz)
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizListingView {
    #[serde(flatten)]
    pub quiz: QuizView,
    pub eligibility: Eligibility,
}

impl From<QuizListing> for QuizListingView {
    fn from(listing: QuizListing) -> Self {
        Self {
            quiz: QuizView::summary(&listing.quiz),
            eligibility: listing.eligibility,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    /// One slot per question; `null` for an unanswered question.
    pub answers: Vec<Option<usize>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub result: QuizAttemptResult,
    pub certificate: Option<Certificate>,
    pub notices: Vec<String>,
}

impl From<SubmissionOutcome> for SubmitResponse {
    fn from(outcome: SubmissionOutcome) -> Self {
        let notices = outcome.notices();
        Self {
            certificate: outcome.certificate.certificate().cloned(),
            result: outcome.result,
            notices,
        }
    }
}

/// Quizzes for the caller's department, each marked locked or unlocked.
pub async fn list_quizzes(
    State(state): State<AppState>,
    session: EmployeeSession,
) -> AppResult<Json<Vec<QuizListingView>>> {
    let listings = state.engine.list_quizzes_for(&session).await?;
    Ok(Json(listings.into_iter().map(Into::into).collect()))
}

/// Opens a quiz for taking. Locked quizzes are refused.
pub async fn start_quiz(
    State(state): State<AppState>,
    session: EmployeeSession,
    Path(quiz_id): Path<Uuid>,
) -> AppResult<Json<QuizView>> {
    let attempt = state.engine.start_attempt(&session, quiz_id).await?;
    Ok(Json(QuizView::with_questions(attempt.quiz())))
}

pub async fn submit_quiz(
    State(state): State<AppState>,
    session: EmployeeSession,
    Path(quiz_id): Path<Uuid>,
    Json(request): Json<SubmitRequest>,
) -> AppResult<Json<SubmitResponse>> {
    let outcome = state
        .engine
        .submit_answers(&session, quiz_id, &request.answers)
        .await?;
    Ok(Json(outcome.into()))
}

pub async fn list_results(
    State(state): State<AppState>,
    session: EmployeeSession,
) -> AppResult<Json<Vec<QuizAttemptResult>>> {
    Ok(Json(state.engine.results_for(&session).await?))
}
