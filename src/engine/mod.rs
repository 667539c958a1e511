pub mod attempt;
pub mod certificate;
pub mod eligibility;
pub mod scoring;

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::db::models::{
    Certificate, CertificateView, EmployeeProfile, NewQuizAttemptResult, QuizAttemptResult,
    QuizDefinition,
};
use crate::db::repositories::{
    CertificateRepository, EmployeeRepository, QuizRepository, ResultRepository,
};
use crate::db::DocumentStore;
use crate::error::{AppError, AppResult};
use crate::session::EmployeeSession;

pub use attempt::{AttemptError, AttemptState, QuizAttempt};
pub use certificate::{CertificateIssuance, CertificateIssuer};
pub use eligibility::{is_quiz_unlocked, Eligibility};
pub use scoring::Grade;

pub const SUBMITTED_MESSAGE: &str = "Quiz submitted!";

/// A quiz offered to an employee, with whether they may take it yet.
#[derive(Debug, Clone)]
pub struct QuizListing {
    pub quiz: QuizDefinition,
    pub eligibility: Eligibility,
}

#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub result: QuizAttemptResult,
    pub certificate: CertificateIssuance,
}

impl SubmissionOutcome {
    /// Messages to show the employee, in order.
    pub fn notices(&self) -> Vec<String> {
        let mut notices = vec![SUBMITTED_MESSAGE.to_string()];
        notices.extend(self.certificate.notice());
        notices
    }
}

/// Runs quiz attempts against the document store: gating, grading, result
/// persistence and certificate issuance.
pub struct QuizEngine {
    store: Arc<dyn DocumentStore>,
    issuer: CertificateIssuer,
}

impl QuizEngine {
    pub fn new(store: Arc<dyn DocumentStore>, issuer: CertificateIssuer) -> Self {
        Self { store, issuer }
    }

    pub async fn load_quiz(&self, quiz_id: Uuid) -> AppResult<QuizDefinition> {
        QuizRepository::get(self.store.as_ref(), quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found.".to_string()))
    }

    pub async fn load_profile(&self, session: &EmployeeSession) -> AppResult<EmployeeProfile> {
        EmployeeRepository::get(self.store.as_ref(), session.employee_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Employee profile not found.".to_string()))
    }

    pub async fn start_attempt(
        &self,
        session: &EmployeeSession,
        quiz_id: Uuid,
    ) -> AppResult<QuizAttempt> {
        let quiz = self.load_quiz(quiz_id).await?;
        let profile = self.load_profile(session).await?;

        if let Eligibility::Locked { required_item } =
            Eligibility::evaluate(&profile.completed_item_ids, quiz.related_training_item_id())
        {
            warn!(employee_id = %profile.id, %quiz_id, %required_item, "Quiz is locked");
            return Err(AppError::Locked(format!(
                "training item {} must be completed first",
                required_item
            )));
        }

        Ok(QuizAttempt::begin(quiz, profile.id))
    }

    /// Grade and persist an attempt positioned on its last question.
    ///
    /// The result is written before any certificate. If the result write
    /// fails the attempt is left in progress with its answers. A certificate
    /// failure is reported in the outcome and never undoes the result.
    pub async fn submit_attempt(&self, attempt: &mut QuizAttempt) -> AppResult<SubmissionOutcome> {
        let answers = attempt.ready_for_submission()?;
        let quiz = attempt.quiz();
        let grade = scoring::grade(quiz.questions(), &answers, quiz.passing_score_percent());

        let new_result = NewQuizAttemptResult {
            employee_id: attempt.employee_id(),
            quiz_id: quiz.id(),
            title: quiz.title().to_string(),
            score_percent: grade.score_percent,
            status: grade.status,
            selected_answers: answers,
            questions_snapshot: quiz.questions().to_vec(),
            submitted_at: OffsetDateTime::now_utc(),
        };

        let result = ResultRepository::create(self.store.as_ref(), &new_result)
            .await
            .map_err(|e| {
                error!(
                    employee_id = %new_result.employee_id,
                    quiz_id = %new_result.quiz_id,
                    "Failed to save quiz result: {}", e
                );
                AppError::Persistence(e.to_string())
            })?;
        attempt.mark_submitted(grade.status);

        info!(
            result_id = %result.id,
            employee_id = %result.employee_id,
            quiz_id = %result.quiz_id,
            score = result.score_percent,
            status = ?result.status,
            "Quiz submitted"
        );

        let certificate = self
            .issuer
            .issue(self.store.as_ref(), attempt.quiz(), result.employee_id, grade.status)
            .await;

        Ok(SubmissionOutcome {
            result,
            certificate,
        })
    }

    /// Submit a whole answer sheet in one call. `None` marks an unanswered
    /// question; the sheet must have one slot per question.
    pub async fn submit_answers(
        &self,
        session: &EmployeeSession,
        quiz_id: Uuid,
        answers: &[Option<usize>],
    ) -> AppResult<SubmissionOutcome> {
        let mut attempt = self.start_attempt(session, quiz_id).await?;
        attempt.fill(answers)?;
        attempt.go_to_last();
        self.submit_attempt(&mut attempt).await
    }

    pub async fn list_quizzes_for(&self, session: &EmployeeSession) -> AppResult<Vec<QuizListing>> {
        let profile = self.load_profile(session).await?;
        let quizzes = QuizRepository::list(self.store.as_ref()).await?;

        Ok(quizzes
            .into_iter()
            .filter(|quiz| quiz.is_visible_to(&profile.department))
            .map(|quiz| {
                let eligibility = Eligibility::evaluate(
                    &profile.completed_item_ids,
                    quiz.related_training_item_id(),
                );
                QuizListing { quiz, eligibility }
            })
            .collect())
    }

    pub async fn results_for(&self, session: &EmployeeSession) -> AppResult<Vec<QuizAttemptResult>> {
        Ok(ResultRepository::list_for_employee(self.store.as_ref(), session.employee_id).await?)
    }

    pub async fn certificates_for(&self, session: &EmployeeSession) -> AppResult<Vec<Certificate>> {
        Ok(CertificateRepository::list_for_employee(self.store.as_ref(), session.employee_id).await?)
    }

    pub async fn get_certificate(&self, certificate_id: Uuid) -> AppResult<CertificateView> {
        let certificate = CertificateRepository::get(self.store.as_ref(), certificate_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Certificate not found.".to_string()))?;
        let employee_name = EmployeeRepository::get(self.store.as_ref(), certificate.employee_id)
            .await?
            .map(|profile| profile.display_name());

        Ok(CertificateView {
            certificate,
            employee_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::AttemptStatus;
    use crate::db::store::{CERTIFICATES, QUIZ_RESULTS};
    use crate::db::testing::{
        memory_store, new_quiz, seed_employee, seed_quiz, seed_training, FailingStore,
    };

    const ISSUER: &str = "Spare Parts Classroom";

    fn engine(store: Arc<dyn DocumentStore>) -> QuizEngine {
        QuizEngine::new(store, CertificateIssuer::new(ISSUER))
    }

    async fn stored_results(store: &dyn DocumentStore) -> usize {
        store.query(QUIZ_RESULTS, &crate::db::Filter::all()).await.unwrap().len()
    }

    async fn stored_certificates(store: &dyn DocumentStore) -> usize {
        store.query(CERTIFICATES, &crate::db::Filter::all()).await.unwrap().len()
    }

    #[tokio::test]
    async fn unanswered_question_is_rejected_without_writing() {
        let store = memory_store();
        let employee = seed_employee(store.as_ref(), "Mechanical").await;
        let quiz = seed_quiz(store.as_ref(), new_quiz(50, None)).await;
        let engine = engine(store.clone());
        let session = EmployeeSession::new(employee.id);

        let mut attempt = engine.start_attempt(&session, quiz.id()).await.unwrap();
        attempt.fill(&[Some(0), Some(1), None, Some(3)]).unwrap();
        attempt.go_to_last();

        let err = engine.submit_attempt(&mut attempt).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ref message) if message == "Please answer all questions before submitting."
        ));
        assert_eq!(attempt.state(), AttemptState::InProgress);
        assert_eq!(stored_results(store.as_ref()).await, 0);
    }

    #[tokio::test]
    async fn all_wrong_answers_still_record_one_result() {
        let store = memory_store();
        let employee = seed_employee(store.as_ref(), "Mechanical").await;
        let quiz = seed_quiz(store.as_ref(), new_quiz(50, Some("Brake Technician"))).await;
        let engine = engine(store.clone());
        let session = EmployeeSession::new(employee.id);

        let outcome = engine
            .submit_answers(&session, quiz.id(), &[Some(3), Some(2), Some(1), Some(0)])
            .await
            .unwrap();

        assert_eq!(outcome.result.score_percent, 0);
        assert_eq!(outcome.result.status, AttemptStatus::Failed);
        assert_eq!(outcome.certificate, CertificateIssuance::NotEligible);
        assert_eq!(outcome.notices(), vec!["Quiz submitted!".to_string()]);
        assert_eq!(stored_results(store.as_ref()).await, 1);
        assert_eq!(stored_certificates(store.as_ref()).await, 0);
    }

    #[tokio::test]
    async fn result_snapshots_quiz_and_answers() {
        let store = memory_store();
        let employee = seed_employee(store.as_ref(), "Mechanical").await;
        let quiz = seed_quiz(store.as_ref(), new_quiz(70, None)).await;
        let engine = engine(store.clone());
        let session = EmployeeSession::new(employee.id);

        let outcome = engine
            .submit_answers(&session, quiz.id(), &[Some(0), Some(1), Some(0), Some(3)])
            .await
            .unwrap();

        let result = &outcome.result;
        assert_eq!(result.employee_id, employee.id);
        assert_eq!(result.quiz_id, quiz.id());
        assert_eq!(result.title, "Brake Safety");
        assert_eq!(result.score_percent, 75);
        assert_eq!(result.status, AttemptStatus::Passed);
        assert_eq!(result.selected_answers, vec![0, 1, 0, 3]);
        assert_eq!(result.questions_snapshot, quiz.questions().to_vec());

        let listed = engine.results_for(&session).await.unwrap();
        assert_eq!(listed, vec![outcome.result.clone()]);
    }

    #[tokio::test]
    async fn passing_a_non_granting_quiz_issues_nothing() {
        let store = memory_store();
        let employee = seed_employee(store.as_ref(), "Mechanical").await;
        let quiz = seed_quiz(store.as_ref(), new_quiz(50, None)).await;
        let engine = engine(store.clone());

        let outcome = engine
            .submit_answers(
                &EmployeeSession::new(employee.id),
                quiz.id(),
                &[Some(0), Some(1), Some(2), Some(3)],
            )
            .await
            .unwrap();

        assert!(outcome.result.status.is_passed());
        assert_eq!(outcome.certificate, CertificateIssuance::NotEligible);
        assert_eq!(stored_certificates(store.as_ref()).await, 0);
    }

    #[tokio::test]
    async fn passing_a_granting_quiz_issues_a_certificate() {
        let store = memory_store();
        let employee = seed_employee(store.as_ref(), "Mechanical").await;
        let training = seed_training(store.as_ref(), "Mechanical").await;
        EmployeeRepository::add_completed_item(store.as_ref(), employee.id, training.id)
            .await
            .unwrap();
        let mut definition = new_quiz(70, Some("Brake Technician"));
        definition.related_training_item_id = Some(training.id);
        let quiz = seed_quiz(store.as_ref(), definition).await;
        let engine = engine(store.clone());

        let outcome = engine
            .submit_answers(
                &EmployeeSession::new(employee.id),
                quiz.id(),
                &[Some(0), Some(1), Some(2), Some(3)],
            )
            .await
            .unwrap();

        let certificate = outcome.certificate.certificate().unwrap();
        assert_eq!(certificate.title, "Brake Technician");
        assert_eq!(certificate.employee_id, employee.id);
        assert_eq!(certificate.quiz_id, Some(quiz.id()));
        assert_eq!(certificate.issuing_body, ISSUER);
        assert_eq!(certificate.related_training_item_id, Some(training.id));
        assert_eq!(
            outcome.notices(),
            vec![
                "Quiz submitted!".to_string(),
                "Congratulations! You've earned the \"Brake Technician\" certificate!".to_string(),
            ]
        );
        assert_eq!(stored_certificates(store.as_ref()).await, 1);
    }

    #[tokio::test]
    async fn each_passing_submission_earns_its_own_certificate() {
        let store = memory_store();
        let employee = seed_employee(store.as_ref(), "Mechanical").await;
        let quiz = seed_quiz(store.as_ref(), new_quiz(70, Some("Brake Technician"))).await;
        let engine = engine(store.clone());
        let session = EmployeeSession::new(employee.id);
        let answers = [Some(0), Some(1), Some(2), Some(3)];

        engine.submit_answers(&session, quiz.id(), &answers).await.unwrap();
        engine.submit_answers(&session, quiz.id(), &answers).await.unwrap();

        assert_eq!(engine.results_for(&session).await.unwrap().len(), 2);
        assert_eq!(engine.certificates_for(&session).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn pass_mark_boundary_is_inclusive() {
        let store = memory_store();
        let employee = seed_employee(store.as_ref(), "Mechanical").await;
        let session = EmployeeSession::new(employee.id);
        let engine = engine(store.clone());
        let three_of_four = [Some(0), Some(1), Some(2), Some(0)];

        let at_mark = seed_quiz(store.as_ref(), new_quiz(75, None)).await;
        let outcome = engine.submit_answers(&session, at_mark.id(), &three_of_four).await.unwrap();
        assert_eq!(outcome.result.status, AttemptStatus::Passed);

        let above_mark = seed_quiz(store.as_ref(), new_quiz(76, None)).await;
        let outcome = engine
            .submit_answers(&session, above_mark.id(), &three_of_four)
            .await
            .unwrap();
        assert_eq!(outcome.result.status, AttemptStatus::Failed);
    }

    #[tokio::test]
    async fn locked_quiz_cannot_be_started() {
        let store = memory_store();
        let employee = seed_employee(store.as_ref(), "Mechanical").await;
        let training = seed_training(store.as_ref(), "Mechanical").await;
        let mut definition = new_quiz(70, None);
        definition.related_training_item_id = Some(training.id);
        let quiz = seed_quiz(store.as_ref(), definition).await;
        let engine = engine(store.clone());
        let session = EmployeeSession::new(employee.id);

        let err = engine.start_attempt(&session, quiz.id()).await.unwrap_err();
        assert!(matches!(err, AppError::Locked(_)));
        let err = engine
            .submit_answers(&session, quiz.id(), &[Some(0), Some(1), Some(2), Some(3)])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Locked(_)));
        assert_eq!(stored_results(store.as_ref()).await, 0);

        EmployeeRepository::add_completed_item(store.as_ref(), employee.id, training.id)
            .await
            .unwrap();
        assert!(engine.start_attempt(&session, quiz.id()).await.is_ok());
    }

    #[tokio::test]
    async fn missing_quiz_or_profile_is_not_found() {
        let store = memory_store();
        let employee = seed_employee(store.as_ref(), "Mechanical").await;
        let quiz = seed_quiz(store.as_ref(), new_quiz(70, None)).await;
        let engine = engine(store.clone());

        let err = engine
            .start_attempt(&EmployeeSession::new(employee.id), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref message) if message == "Quiz not found."));

        let err = engine
            .start_attempt(&EmployeeSession::new(Uuid::new_v4()), quiz.id())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn answer_sheet_must_match_question_count() {
        let store = memory_store();
        let employee = seed_employee(store.as_ref(), "Mechanical").await;
        let quiz = seed_quiz(store.as_ref(), new_quiz(70, None)).await;
        let engine = engine(store.clone());

        let err = engine
            .submit_answers(&EmployeeSession::new(employee.id), quiz.id(), &[Some(0)])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(stored_results(store.as_ref()).await, 0);
    }

    #[tokio::test]
    async fn failed_result_write_keeps_attempt_in_progress() {
        let store: Arc<dyn DocumentStore> = Arc::new(FailingStore::new(QUIZ_RESULTS));
        let employee = seed_employee(store.as_ref(), "Mechanical").await;
        let quiz = seed_quiz(store.as_ref(), new_quiz(50, Some("Brake Technician"))).await;
        let engine = engine(store.clone());

        let mut attempt = engine
            .start_attempt(&EmployeeSession::new(employee.id), quiz.id())
            .await
            .unwrap();
        attempt.fill(&[Some(0), Some(1), Some(2), Some(3)]).unwrap();
        attempt.go_to_last();

        let err = engine.submit_attempt(&mut attempt).await.unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));
        assert_eq!(attempt.state(), AttemptState::InProgress);
        assert_eq!(attempt.answers(), &[Some(0), Some(1), Some(2), Some(3)]);
        assert_eq!(stored_certificates(store.as_ref()).await, 0);
    }

    #[tokio::test]
    async fn failed_certificate_write_keeps_the_result() {
        let store: Arc<dyn DocumentStore> = Arc::new(FailingStore::new(CERTIFICATES));
        let employee = seed_employee(store.as_ref(), "Mechanical").await;
        let quiz = seed_quiz(store.as_ref(), new_quiz(50, Some("Brake Technician"))).await;
        let engine = engine(store.clone());

        let mut attempt = engine
            .start_attempt(&EmployeeSession::new(employee.id), quiz.id())
            .await
            .unwrap();
        attempt.fill(&[Some(0), Some(1), Some(2), Some(3)]).unwrap();
        attempt.go_to_last();

        let outcome = engine.submit_attempt(&mut attempt).await.unwrap();
        assert_eq!(attempt.state(), AttemptState::Submitted(AttemptStatus::Passed));
        assert!(matches!(outcome.certificate, CertificateIssuance::Failed { .. }));
        assert_eq!(
            outcome.notices().last().map(String::as_str),
            Some(certificate::ISSUANCE_FAILED_MESSAGE)
        );
        assert_eq!(stored_results(store.as_ref()).await, 1);
    }

    #[tokio::test]
    async fn quiz_listing_filters_by_department_and_flags_locks() {
        let store = memory_store();
        let employee = seed_employee(store.as_ref(), "Mechanical").await;
        let training = seed_training(store.as_ref(), "Mechanical").await;

        let open = seed_quiz(store.as_ref(), new_quiz(70, None)).await;
        let mut gated = new_quiz(70, None);
        gated.related_training_item_id = Some(training.id);
        gated.department = "mechanical".to_string();
        let gated = seed_quiz(store.as_ref(), gated).await;
        let mut other = new_quiz(70, None);
        other.department = "Electrical".to_string();
        seed_quiz(store.as_ref(), other).await;

        let engine = engine(store.clone());
        let listings = engine
            .list_quizzes_for(&EmployeeSession::new(employee.id))
            .await
            .unwrap();

        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].quiz.id(), open.id());
        assert_eq!(listings[0].eligibility, Eligibility::Unlocked);
        assert_eq!(listings[1].quiz.id(), gated.id());
        assert_eq!(
            listings[1].eligibility,
            Eligibility::Locked { required_item: training.id }
        );
    }

    #[tokio::test]
    async fn certificate_view_carries_employee_name() {
        let store = memory_store();
        let employee = seed_employee(store.as_ref(), "Mechanical").await;
        let quiz = seed_quiz(store.as_ref(), new_quiz(70, Some("Brake Technician"))).await;
        let engine = engine(store.clone());

        let outcome = engine
            .submit_answers(
                &EmployeeSession::new(employee.id),
                quiz.id(),
                &[Some(0), Some(1), Some(2), Some(3)],
            )
            .await
            .unwrap();
        let certificate_id = outcome.certificate.certificate().unwrap().id;

        let view = engine.get_certificate(certificate_id).await.unwrap();
        assert_eq!(view.employee_name.as_deref(), Some("Ayla Demir"));
        assert_eq!(view.certificate.issuing_body, ISSUER);

        let err = engine.get_certificate(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
