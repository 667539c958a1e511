use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use uuid::Uuid;

use crate::error::AppError;

pub const EMPLOYEE_ID_HEADER: &str = "X-Employee-Id";

/// The authenticated employee making the request. Identity is established
/// upstream; the portal only reads the forwarded employee id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmployeeSession {
    pub employee_id: Uuid,
}

impl EmployeeSession {
    pub fn new(employee_id: Uuid) -> Self {
        Self { employee_id }
    }
}

fn employee_id_from_headers(headers: &HeaderMap) -> Result<Uuid, AppError> {
    let value = headers
        .get(EMPLOYEE_ID_HEADER)
        .ok_or_else(|| AppError::Authentication(format!("missing {} header", EMPLOYEE_ID_HEADER)))?;

    value
        .to_str()
        .ok()
        .and_then(|raw| raw.trim().parse::<Uuid>().ok())
        .ok_or_else(|| AppError::Authentication(format!("malformed {} header", EMPLOYEE_ID_HEADER)))
}

impl<S> FromRequestParts<S> for EmployeeSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        employee_id_from_headers(&parts.headers).map(EmployeeSession::new)
    }
}
