use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: Uuid,
    pub employee_id: Uuid,
    #[serde(default)]
    pub quiz_id: Option<Uuid>,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub issued_date: OffsetDateTime,
    pub issuing_body: String,
    #[serde(default)]
    pub related_training_item_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCertificate {
    pub employee_id: Uuid,
    pub quiz_id: Option<Uuid>,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub issued_date: OffsetDateTime,
    pub issuing_body: String,
    pub related_training_item_id: Option<Uuid>,
}

/// A certificate as shown to its holder, with the employee's display name
/// when the profile still exists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateView {
    #[serde(flatten)]
    pub certificate: Certificate,
    pub employee_name: Option<String>,
}
