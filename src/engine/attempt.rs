use std::time::Duration;

use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::models::{AttemptStatus, Question, QuizDefinition};
use crate::error::AppError;

pub const INCOMPLETE_MESSAGE: &str = "Please answer all questions before submitting.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    #[error("question {index} does not exist; the quiz has {count} questions")]
    QuestionOutOfRange { index: usize, count: usize },

    #[error("option {option} does not exist for question {question}")]
    OptionOutOfRange { question: usize, option: usize },

    #[error("expected {expected} answers, got {actual}")]
    AnswerCountMismatch { expected: usize, actual: usize },

    #[error("{}", INCOMPLETE_MESSAGE)]
    Incomplete { unanswered: Vec<usize> },

    #[error("the attempt can only be submitted from the last question")]
    NotOnLastQuestion,

    #[error("the attempt has already been submitted")]
    AlreadySubmitted,
}

impl From<AttemptError> for AppError {
    fn from(err: AttemptError) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    InProgress,
    Submitted(AttemptStatus),
}

/// One employee's pass through a quiz: the answer sheet and the question
/// currently shown. Slots stay `None` until an option is picked.
#[derive(Debug, Clone)]
pub struct QuizAttempt {
    quiz: QuizDefinition,
    employee_id: Uuid,
    answers: Vec<Option<usize>>,
    current: usize,
    state: AttemptState,
    started_at: OffsetDateTime,
}

impl QuizAttempt {
    pub(crate) fn begin(quiz: QuizDefinition, employee_id: Uuid) -> Self {
        let answers = vec![None; quiz.question_count()];
        Self {
            quiz,
            employee_id,
            answers,
            current: 0,
            state: AttemptState::InProgress,
            started_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn quiz(&self) -> &QuizDefinition {
        &self.quiz
    }

    pub fn employee_id(&self) -> Uuid {
        self.employee_id
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn started_at(&self) -> OffsetDateTime {
        self.started_at
    }

    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &Question {
        &self.quiz.questions()[self.current]
    }

    pub fn is_last_question(&self) -> bool {
        self.current + 1 == self.answers.len()
    }

    /// Advisory only; nothing is cut off when it elapses.
    pub fn time_limit(&self) -> Option<Duration> {
        self.quiz
            .time_limit_minutes()
            .map(|minutes| Duration::from_secs(u64::from(minutes) * 60))
    }

    /// Move forward one question. Returns false when already on the last one.
    pub fn next(&mut self) -> bool {
        if self.is_last_question() {
            return false;
        }
        self.current += 1;
        true
    }

    pub fn previous(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    pub fn go_to(&mut self, index: usize) -> Result<(), AttemptError> {
        self.check_question(index)?;
        self.current = index;
        Ok(())
    }

    pub fn go_to_last(&mut self) {
        self.current = self.answers.len().saturating_sub(1);
    }

    /// Record (or change) the answer for any question of an in-progress attempt.
    pub fn select_answer(&mut self, question: usize, option: usize) -> Result<(), AttemptError> {
        self.ensure_in_progress()?;
        self.check_question(question)?;
        if !self.quiz.questions()[question].has_option(option) {
            return Err(AttemptError::OptionOutOfRange { question, option });
        }
        self.answers[question] = Some(option);
        Ok(())
    }

    /// Load a whole answer sheet at once. Slots left `None` stay unanswered.
    pub fn fill(&mut self, answers: &[Option<usize>]) -> Result<(), AttemptError> {
        if answers.len() != self.answers.len() {
            return Err(AttemptError::AnswerCountMismatch {
                expected: self.answers.len(),
                actual: answers.len(),
            });
        }
        for (question, answer) in answers.iter().enumerate() {
            if let Some(option) = answer {
                self.select_answer(question, *option)?;
            }
        }
        Ok(())
    }

    pub fn unanswered(&self) -> Vec<usize> {
        self.answers
            .iter()
            .enumerate()
            .filter(|(_, answer)| answer.is_none())
            .map(|(index, _)| index)
            .collect()
    }

    /// The answer sheet, if the attempt may be submitted now.
    pub(crate) fn ready_for_submission(&self) -> Result<Vec<usize>, AttemptError> {
        self.ensure_in_progress()?;
        if !self.is_last_question() {
            return Err(AttemptError::NotOnLastQuestion);
        }
        let unanswered = self.unanswered();
        if !unanswered.is_empty() {
            return Err(AttemptError::Incomplete { unanswered });
        }
        Ok(self.answers.iter().flatten().copied().collect())
    }

    pub(crate) fn mark_submitted(&mut self, status: AttemptStatus) {
        self.state = AttemptState::Submitted(status);
    }

    fn ensure_in_progress(&self) -> Result<(), AttemptError> {
        match self.state {
            AttemptState::InProgress => Ok(()),
            AttemptState::Submitted(_) => Err(AttemptError::AlreadySubmitted),
        }
    }

    fn check_question(&self, index: usize) -> Result<(), AttemptError> {
        if index < self.answers.len() {
            Ok(())
        } else {
            Err(AttemptError::QuestionOutOfRange {
                index,
                count: self.answers.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{NewQuizDefinition, QuestionDocument, ALL_DEPARTMENTS};

    fn quiz(questions: usize, time_limit_minutes: Option<u32>) -> QuizDefinition {
        NewQuizDefinition {
            title: "Lifting Equipment".to_string(),
            description: None,
            questions: (0..questions)
                .map(|i| QuestionDocument {
                    question_text: format!("Question {}", i),
                    options: vec!["a".into(), "b".into(), "c".into()],
                    correct_answer_index: i % 3,
                })
                .collect(),
            passing_score_percent: 70,
            time_limit_minutes,
            related_training_item_id: None,
            department: ALL_DEPARTMENTS.to_string(),
            grants_certificate: false,
            certificate_title: None,
        }
        .into_definition()
        .unwrap()
    }

    #[test]
    fn starts_on_first_question_with_empty_sheet() {
        let attempt = QuizAttempt::begin(quiz(3, None), Uuid::new_v4());
        assert_eq!(attempt.state(), AttemptState::InProgress);
        assert_eq!(attempt.current_index(), 0);
        assert_eq!(attempt.answers(), &[None, None, None]);
        assert_eq!(attempt.current_question().text(), "Question 0");
        assert_eq!(attempt.unanswered(), vec![0, 1, 2]);
    }

    #[test]
    fn navigation_stays_in_bounds() {
        let mut attempt = QuizAttempt::begin(quiz(3, None), Uuid::new_v4());
        assert!(!attempt.previous());
        assert!(attempt.next());
        assert!(attempt.next());
        assert!(attempt.is_last_question());
        assert!(!attempt.next());
        assert_eq!(attempt.current_index(), 2);

        assert!(attempt.go_to(0).is_ok());
        assert_eq!(
            attempt.go_to(3),
            Err(AttemptError::QuestionOutOfRange { index: 3, count: 3 })
        );
        assert_eq!(attempt.current_index(), 0);
    }

    #[test]
    fn answers_can_be_changed_for_any_question() {
        let mut attempt = QuizAttempt::begin(quiz(3, None), Uuid::new_v4());
        attempt.select_answer(2, 1).unwrap();
        attempt.select_answer(2, 0).unwrap();
        assert_eq!(attempt.answers(), &[None, None, Some(0)]);
        assert_eq!(attempt.current_index(), 0);

        assert_eq!(
            attempt.select_answer(1, 3),
            Err(AttemptError::OptionOutOfRange { question: 1, option: 3 })
        );
        assert_eq!(
            attempt.select_answer(5, 0),
            Err(AttemptError::QuestionOutOfRange { index: 5, count: 3 })
        );
    }

    #[test]
    fn submission_requires_last_question_and_full_sheet() {
        let mut attempt = QuizAttempt::begin(quiz(2, None), Uuid::new_v4());
        attempt.select_answer(0, 0).unwrap();
        attempt.select_answer(1, 1).unwrap();
        assert_eq!(
            attempt.ready_for_submission(),
            Err(AttemptError::NotOnLastQuestion)
        );

        attempt.go_to_last();
        assert_eq!(attempt.ready_for_submission(), Ok(vec![0, 1]));
    }

    #[test]
    fn incomplete_sheet_names_missing_questions() {
        let mut attempt = QuizAttempt::begin(quiz(3, None), Uuid::new_v4());
        attempt.fill(&[Some(0), None, Some(2)]).unwrap();
        attempt.go_to_last();

        let err = attempt.ready_for_submission().unwrap_err();
        assert_eq!(err, AttemptError::Incomplete { unanswered: vec![1] });
        assert_eq!(err.to_string(), INCOMPLETE_MESSAGE);
    }

    #[test]
    fn fill_checks_sheet_length() {
        let mut attempt = QuizAttempt::begin(quiz(2, None), Uuid::new_v4());
        assert_eq!(
            attempt.fill(&[Some(0)]),
            Err(AttemptError::AnswerCountMismatch { expected: 2, actual: 1 })
        );
    }

    #[test]
    fn submitted_attempt_is_frozen() {
        let mut attempt = QuizAttempt::begin(quiz(1, None), Uuid::new_v4());
        attempt.select_answer(0, 0).unwrap();
        attempt.mark_submitted(AttemptStatus::Passed);

        assert_eq!(attempt.select_answer(0, 1), Err(AttemptError::AlreadySubmitted));
        assert_eq!(attempt.ready_for_submission(), Err(AttemptError::AlreadySubmitted));
    }

    #[test]
    fn exposes_time_limit() {
        let attempt = QuizAttempt::begin(quiz(1, Some(15)), Uuid::new_v4());
        assert_eq!(attempt.time_limit(), Some(Duration::from_secs(900)));
        let untimed = QuizAttempt::begin(quiz(1, None), Uuid::new_v4());
        assert_eq!(untimed.time_limit(), None);
    }
}
