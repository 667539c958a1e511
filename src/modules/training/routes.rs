use axum::{routing::{get, post}, Router};

use super::handlers::{list_training, mark_complete, record_view, report_progress};
use crate::app_state::AppState;

pub fn training_routes() -> Router<AppState> {
    Router::new()
        .route("/training", get(list_training))
        .route("/training/{id}/view", post(record_view))
        .route("/training/{id}/progress", post(report_progress))
        .route("/training/{id}/complete", post(mark_complete))
}
