use axum::{extract::State, http::StatusCode, response::Json};
use tracing::info;

use crate::app_state::AppState;
use crate::catalog::Overview;
use crate::db::models::{NewQuizDefinition, QuizDefinition};
use crate::db::repositories::QuizRepository;
use crate::db::DatabaseError;
use crate::error::{AppError, AppResult};

pub async fn create_quiz(
    State(state): State<AppState>,
    Json(new_quiz): Json<NewQuizDefinition>,
) -> AppResult<(StatusCode, Json<QuizDefinition>)> {
    let quiz = QuizRepository::create(state.store.as_ref(), new_quiz)
        .await
        .map_err(|e| match e {
            DatabaseError::InvalidInput(message) => AppError::Validation(message),
            other => other.into(),
        })?;
    info!(quiz_id = %quiz.id(), title = quiz.title(), "Quiz created");
    Ok((StatusCode::CREATED, Json(quiz)))
}

/// Headline counts for the admin dashboard.
pub async fn overview(State(state): State<AppState>) -> AppResult<Json<Overview>> {
    Ok(Json(state.catalog.overview().await?))
}
