use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::models::{Certificate, CertificateView};
use crate::error::AppResult;
use crate::session::EmployeeSession;

pub async fn list_certificates(
    State(state): State<AppState>,
    session: EmployeeSession,
) -> AppResult<Json<Vec<Certificate>>> {
    Ok(Json(state.engine.certificates_for(&session).await?))
}

/// Single certificate for display or verification. Readable without a
/// session.
pub async fn get_certificate(
    State(state): State<AppState>,
    Path(certificate_id): Path<Uuid>,
) -> AppResult<Json<CertificateView>> {
    Ok(Json(state.engine.get_certificate(certificate_id).await?))
}
