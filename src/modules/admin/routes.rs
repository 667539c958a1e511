use axum::{routing::{get, post}, Router};

use super::handlers::{create_quiz, overview};
use crate::app_state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/quizzes", post(create_quiz))
        .route("/overview", get(overview))
}
