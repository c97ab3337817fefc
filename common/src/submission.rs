//! The submission form and the validated `Submission` it produces.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Number of free-text answers on the form.
pub const ANSWER_COUNT: usize = 3;

/// Canonical field order used when reporting validation failures.
const FIELD_ORDER: [&str; 4] = ["student_id", "answer_1", "answer_2", "answer_3"];

/// Raw form input exactly as the browser sent it.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct SubmissionForm {
    #[validate(custom(function = "not_blank", message = "Student ID is required"))]
    #[serde(default)]
    pub student_id: String,

    #[validate(custom(function = "not_blank", message = "Answer 1 is required"))]
    #[serde(default)]
    pub answer_1: String,

    #[validate(custom(function = "not_blank", message = "Answer 2 is required"))]
    #[serde(default)]
    pub answer_2: String,

    #[validate(custom(function = "not_blank", message = "Answer 3 is required"))]
    #[serde(default)]
    pub answer_3: String,
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

/// A form that failed validation. `fields` lists every failing field in form order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub fields: Vec<String>,
    pub message: String,
}

/// A validated, immutable submission. All values are stored trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    student_id: String,
    answers: [String; ANSWER_COUNT],
}

impl SubmissionForm {
    pub fn new(
        student_id: impl Into<String>,
        answers: [&str; ANSWER_COUNT],
    ) -> Self {
        Self {
            student_id: student_id.into(),
            answer_1: answers[0].to_owned(),
            answer_2: answers[1].to_owned(),
            answer_3: answers[2].to_owned(),
        }
    }

    /// Validates the form and produces a [`Submission`].
    ///
    /// Every field must be non-empty after trimming. No I/O happens here.
    pub fn collect(&self) -> Result<Submission, ValidationError> {
        if let Err(errors) = self.validate() {
            let failing = errors.field_errors();
            let fields: Vec<String> = FIELD_ORDER
                .iter()
                .filter(|name| failing.contains_key(**name))
                .map(|name| name.to_string())
                .collect();

            let message = FIELD_ORDER
                .iter()
                .filter_map(|name| failing.get(*name))
                .flat_map(|errs| errs.iter().filter_map(|e| e.message.as_ref()))
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join("; ");

            return Err(ValidationError { fields, message });
        }

        Ok(Submission {
            student_id: self.student_id.trim().to_owned(),
            answers: [
                self.answer_1.trim().to_owned(),
                self.answer_2.trim().to_owned(),
                self.answer_3.trim().to_owned(),
            ],
        })
    }
}

impl Submission {
    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn answers(&self) -> &[String; ANSWER_COUNT] {
        &self.answers
    }

    /// Answer for a 1-based question number.
    pub fn answer(&self, question_number: u8) -> Option<&str> {
        let index = usize::from(question_number).checked_sub(1)?;
        self.answers.get(index).map(String::as_str)
    }
}
