use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use super::{department_matches, ALL_DEPARTMENTS};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizValidationError {
    #[error("question text must not be empty")]
    EmptyQuestionText,

    #[error("a question needs at least 2 options, got {0}")]
    TooFewOptions(usize),

    #[error("correct answer index {index} is out of range for {options} options")]
    CorrectAnswerOutOfRange { index: usize, options: usize },

    #[error("quiz title must not be empty")]
    EmptyTitle,

    #[error("a quiz needs at least one question")]
    NoQuestions,

    #[error("passing score must be between 1 and 100, got {0}")]
    PassingScoreOutOfRange(u32),

    #[error("a certificate title is required when the quiz grants a certificate")]
    MissingCertificateTitle,
}

/// A single-choice question. Option count and the correct index are checked
/// at construction, including when decoded from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionDocument", into = "QuestionDocument")]
pub struct Question {
    text: String,
    options: Vec<String>,
    correct_option: usize,
}

impl Question {
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_option: usize,
    ) -> Result<Self, QuizValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuizValidationError::EmptyQuestionText);
        }
        if options.len() < 2 {
            return Err(QuizValidationError::TooFewOptions(options.len()));
        }
        if correct_option >= options.len() {
            return Err(QuizValidationError::CorrectAnswerOutOfRange {
                index: correct_option,
                options: options.len(),
            });
        }
        Ok(Self {
            text,
            options,
            correct_option,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_option(&self) -> usize {
        self.correct_option
    }

    pub fn has_option(&self, option: usize) -> bool {
        option < self.options.len()
    }

    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_option
    }
}

/// Stored/authored shape of a [`Question`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDocument {
    #[validate(length(min = 1))]
    pub question_text: String,
    #[validate(length(min = 2))]
    pub options: Vec<String>,
    pub correct_answer_index: usize,
}

impl TryFrom<QuestionDocument> for Question {
    type Error = QuizValidationError;

    fn try_from(doc: QuestionDocument) -> Result<Self, Self::Error> {
        Question::new(doc.question_text, doc.options, doc.correct_answer_index)
    }
}

impl From<Question> for QuestionDocument {
    fn from(question: Question) -> Self {
        Self {
            question_text: question.text,
            options: question.options,
            correct_answer_index: question.correct_option,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificatePolicy {
    NoCertificate,
    Grants { title: String },
}

impl CertificatePolicy {
    pub fn from_fields(
        grants_certificate: bool,
        certificate_title: Option<String>,
    ) -> Result<Self, QuizValidationError> {
        if !grants_certificate {
            return Ok(CertificatePolicy::NoCertificate);
        }
        match certificate_title {
            Some(title) if !title.trim().is_empty() => Ok(CertificatePolicy::Grants { title }),
            _ => Err(QuizValidationError::MissingCertificateTitle),
        }
    }

    pub fn grants(&self) -> bool {
        matches!(self, CertificatePolicy::Grants { .. })
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            CertificatePolicy::NoCertificate => None,
            CertificatePolicy::Grants { title } => Some(title),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuizDocument", into = "QuizDocument")]
pub struct QuizDefinition {
    id: Uuid,
    title: String,
    description: Option<String>,
    questions: Vec<Question>,
    passing_score_percent: u8,
    time_limit_minutes: Option<u32>,
    related_training_item_id: Option<Uuid>,
    department: String,
    certificate: CertificatePolicy,
}

impl QuizDefinition {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn passing_score_percent(&self) -> u8 {
        self.passing_score_percent
    }

    /// Shown to the employee; attempts are not cut off when it elapses.
    pub fn time_limit_minutes(&self) -> Option<u32> {
        self.time_limit_minutes
    }

    pub fn related_training_item_id(&self) -> Option<Uuid> {
        self.related_training_item_id
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn certificate(&self) -> &CertificatePolicy {
        &self.certificate
    }

    pub fn is_visible_to(&self, department: &str) -> bool {
        department_matches(&self.department, department)
    }

    pub(crate) fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

/// Stored shape of a [`QuizDefinition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDocument {
    #[serde(default)]
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<QuestionDocument>,
    pub passing_score_percent: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_training_item_id: Option<Uuid>,
    #[serde(default = "all_departments")]
    pub department: String,
    #[serde(default)]
    pub grants_certificate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_title: Option<String>,
}

fn all_departments() -> String {
    ALL_DEPARTMENTS.to_string()
}

impl TryFrom<QuizDocument> for QuizDefinition {
    type Error = QuizValidationError;

    fn try_from(doc: QuizDocument) -> Result<Self, Self::Error> {
        if doc.title.trim().is_empty() {
            return Err(QuizValidationError::EmptyTitle);
        }
        if doc.questions.is_empty() {
            return Err(QuizValidationError::NoQuestions);
        }
        let passing_score_percent = match doc.passing_score_percent {
            score @ 1..=100 => score as u8,
            other => return Err(QuizValidationError::PassingScoreOutOfRange(other)),
        };
        let questions = doc
            .questions
            .into_iter()
            .map(Question::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let certificate =
            CertificatePolicy::from_fields(doc.grants_certificate, doc.certificate_title)?;

        Ok(Self {
            id: doc.id,
            title: doc.title,
            description: doc.description,
            questions,
            passing_score_percent,
            time_limit_minutes: doc.time_limit_minutes.filter(|minutes| *minutes > 0),
            related_training_item_id: doc.related_training_item_id,
            department: doc.department,
            certificate,
        })
    }
}

impl From<QuizDefinition> for QuizDocument {
    fn from(quiz: QuizDefinition) -> Self {
        let certificate_title = quiz.certificate.title().map(str::to_string);
        Self {
            id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            questions: quiz.questions.into_iter().map(Into::into).collect(),
            passing_score_percent: u32::from(quiz.passing_score_percent),
            time_limit_minutes: quiz.time_limit_minutes,
            related_training_item_id: quiz.related_training_item_id,
            department: quiz.department,
            grants_certificate: quiz.certificate.grants(),
            certificate_title,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewQuizDefinition {
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(length(min = 1), nested)]
    pub questions: Vec<QuestionDocument>,
    #[validate(range(min = 1, max = 100))]
    pub passing_score_percent: u32,
    #[validate(range(min = 1))]
    pub time_limit_minutes: Option<u32>,
    #[serde(default)]
    pub related_training_item_id: Option<Uuid>,
    #[serde(default = "all_departments")]
    pub department: String,
    #[serde(default)]
    pub grants_certificate: bool,
    #[serde(default)]
    pub certificate_title: Option<String>,
}

impl NewQuizDefinition {
    pub fn into_definition(self) -> Result<QuizDefinition, QuizValidationError> {
        QuizDefinition::try_from(QuizDocument {
            id: Uuid::nil(),
            title: self.title,
            description: self.description,
            questions: self.questions,
            passing_score_percent: self.passing_score_percent,
            time_limit_minutes: self.time_limit_minutes,
            related_training_item_id: self.related_training_item_id,
            department: self.department,
            grants_certificate: self.grants_certificate,
            certificate_title: self.certificate_title,
        })
    }
}
