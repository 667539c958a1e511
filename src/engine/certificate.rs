use time::OffsetDateTime;
use tracing::{error, info};
use uuid::Uuid;

use crate::db::models::{AttemptStatus, Certificate, NewCertificate, QuizDefinition};
use crate::db::repositories::CertificateRepository;
use crate::db::DocumentStore;

pub const ISSUANCE_FAILED_MESSAGE: &str =
    "Quiz passed, but there was an issue issuing your certificate. Please contact admin.";

#[derive(Debug, Clone, PartialEq)]
pub enum CertificateIssuance {
    /// The attempt failed or the quiz grants no certificate.
    NotEligible,
    Issued(Certificate),
    /// The attempt earned a certificate but it could not be written. The
    /// attempt result stands regardless.
    Failed { message: String },
}

impl CertificateIssuance {
    pub fn notice(&self) -> Option<String> {
        match self {
            CertificateIssuance::NotEligible => None,
            CertificateIssuance::Issued(certificate) => Some(format!(
                "Congratulations! You've earned the \"{}\" certificate!",
                certificate.title
            )),
            CertificateIssuance::Failed { message } => Some(message.clone()),
        }
    }

    pub fn certificate(&self) -> Option<&Certificate> {
        match self {
            CertificateIssuance::Issued(certificate) => Some(certificate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CertificateIssuer {
    issuing_body: String,
}

impl CertificateIssuer {
    pub fn new(issuing_body: impl Into<String>) -> Self {
        Self {
            issuing_body: issuing_body.into(),
        }
    }

    /// Issue a certificate for a passed attempt on a granting quiz. Every
    /// qualifying submission gets its own certificate.
    pub async fn issue(
        &self,
        store: &dyn DocumentStore,
        quiz: &QuizDefinition,
        employee_id: Uuid,
        status: AttemptStatus,
    ) -> CertificateIssuance {
        let Some(title) = quiz.certificate().title() else {
            return CertificateIssuance::NotEligible;
        };
        if !status.is_passed() {
            return CertificateIssuance::NotEligible;
        }

        let new_certificate = NewCertificate {
            employee_id,
            quiz_id: Some(quiz.id()),
            title: title.to_string(),
            issued_date: OffsetDateTime::now_utc(),
            issuing_body: self.issuing_body.clone(),
            related_training_item_id: quiz.related_training_item_id(),
        };

        match CertificateRepository::create(store, &new_certificate).await {
            Ok(certificate) => {
                info!(
                    certificate_id = %certificate.id,
                    %employee_id,
                    quiz_id = %quiz.id(),
                    "Certificate issued"
                );
                CertificateIssuance::Issued(certificate)
            }
            Err(e) => {
                error!(%employee_id, quiz_id = %quiz.id(), "Failed to issue certificate: {}", e);
                CertificateIssuance::Failed {
                    message: ISSUANCE_FAILED_MESSAGE.to_string(),
                }
            }
        }
    }
}
