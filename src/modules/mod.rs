pub mod admin;
pub mod certificates;
pub mod quizzes;
pub mod training;

use axum::Router;

use crate::app_state::AppState;

/// Employee-facing JSON API, mounted under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(training::routes::training_routes())
        .merge(quizzes::routes::quiz_routes())
        .merge(certificates::routes::certificate_routes())
}
