use axum::{routing::get, Router};

use super::handlers::{get_certificate, list_certificates};
use crate::app_state::AppState;

pub fn certificate_routes() -> Router<AppState> {
    Router::new()
        .route("/certificates", get(list_certificates))
        .route("/certificates/{id}", get(get_certificate))
}
