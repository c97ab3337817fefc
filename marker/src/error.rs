//! Marker Error Types
//!
//! [`MarkerError`] is the grading-service error: every way a grading request can fail
//! once a valid submission has been handed to a [`crate::Grader`]. None of these is
//! fatal; the caller reports it and the student may retry.

/// Represents all error types that can occur while grading a submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkerError {
    /// The request never produced an HTTP response (DNS, TLS, connection reset, ...).
    #[error("grading service unreachable while grading question {question}: {reason}")]
    Transport { question: u8, reason: String },

    /// The grading service answered with a non-success status.
    #[error("grading service returned {status} for question {question}: {body}")]
    ServiceStatus { question: u8, status: u16, body: String },

    /// The response body was not the expected completion envelope.
    #[error("invalid response envelope for question {question}: {reason}")]
    InvalidEnvelope { question: u8, reason: String },

    /// The model's text could not be parsed into a verdict and explanation.
    #[error("malformed grading output for question {question}: {reason}")]
    MalformedResponse { question: u8, reason: String },

    /// The rubric has no guideline for a question being graded.
    #[error("no rubric entry for question {0}")]
    MissingRubricEntry(u8),

    /// A grader returned the wrong number of entries or entries out of order.
    #[error("grader returned incomplete feedback: {0}")]
    IncompleteFeedback(String),

    /// The grading configuration is unusable (e.g. empty API key).
    #[error("invalid grading configuration: {0}")]
    Config(String),
}
