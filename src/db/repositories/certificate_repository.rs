use uuid::Uuid;

use super::decode_all;
use crate::db::models::{Certificate, NewCertificate};
use crate::db::store::{to_body, Document, DocumentStore, Filter, CERTIFICATES};
use crate::db::DatabaseError;

pub struct CertificateRepository;

impl CertificateRepository {
    pub async fn create(
        store: &dyn DocumentStore,
        certificate: &NewCertificate,
    ) -> Result<Certificate, DatabaseError> {
        let body = to_body(certificate)?;
        let id = store.add(CERTIFICATES, body.clone()).await?;
        Document::new(id, body).into_record()
    }

    pub async fn get(
        store: &dyn DocumentStore,
        certificate_id: Uuid,
    ) -> Result<Option<Certificate>, DatabaseError> {
        store
            .get(CERTIFICATES, certificate_id)
            .await?
            .map(Document::into_record)
            .transpose()
    }

    /// The employee's certificates, newest first.
    pub async fn list_for_employee(
        store: &dyn DocumentStore,
        employee_id: Uuid,
    ) -> Result<Vec<Certificate>, DatabaseError> {
        let filter = Filter::all().eq("employeeId", employee_id.to_string());
        let mut certificates: Vec<Certificate> =
            decode_all(store.query(CERTIFICATES, &filter).await?)?;
        certificates.reverse();
        certificates.sort_by(|a, b| b.issued_date.cmp(&a.issued_date));
        Ok(certificates)
    }

    pub async fn count(store: &dyn DocumentStore) -> Result<usize, DatabaseError> {
        Ok(store.query(CERTIFICATES, &Filter::all()).await?.len())
    }
}
