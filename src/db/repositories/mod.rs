mod certificate_repository;
mod employee_repository;
mod quiz_repository;
mod result_repository;
mod training_repository;

pub use certificate_repository::CertificateRepository;
pub use employee_repository::EmployeeRepository;
pub use quiz_repository::QuizRepository;
pub use result_repository::ResultRepository;
pub use training_repository::TrainingRepository;

use serde::de::DeserializeOwned;

use super::store::Document;
use super::DatabaseError;

fn decode_all<T: DeserializeOwned>(docs: Vec<Document>) -> Result<Vec<T>, DatabaseError> {
    docs.into_iter().map(Document::into_record).collect()
}

fn invalid<E: std::fmt::Display>(err: E) -> DatabaseError {
    DatabaseError::InvalidInput(err.to_string())
}
