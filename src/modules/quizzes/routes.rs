use axum::{routing::{get, post}, Router};

use super::handlers::{list_quizzes, list_results, start_quiz, submit_quiz};
use crate::app_state::AppState;

pub fn quiz_routes() -> Router<AppState> {
    Router::new()
        .route("/quizzes", get(list_quizzes))
        .route("/quizzes/{id}", get(start_quiz))
        .route("/quizzes/{id}/submit", post(submit_quiz))
        .route("/results", get(list_results))
}
