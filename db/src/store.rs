//! The persisted shape of a graded submission and the store seam that writes it.

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use common::{ANSWER_COUNT, Feedback, Submission};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier the store assigned to an inserted row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    /// The record itself is unusable (feedback/answer mismatch, unreadable stored row).
    #[error("invalid submission record: {0}")]
    InvalidRecord(String),

    /// The store could not be reached.
    #[error("submission store unreachable: {0}")]
    Transport(String),

    /// The store refused our credentials.
    #[error("submission store rejected credentials ({status}): {body}")]
    Unauthorized { status: u16, body: String },

    /// The store answered with any other non-success status.
    #[error("submission store rejected insert ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// The store accepted the insert but the reply could not be understood.
    #[error("unexpected response from submission store: {0}")]
    InvalidResponse(String),

    #[error("database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for PersistenceError {
    fn from(err: sea_orm::DbErr) -> Self {
        PersistenceError::Database(err.to_string())
    }
}

/// A submission together with its feedback, ready to be written once.
///
/// `feedback` always has exactly one entry per answer, ordered by question number.
/// `created_at` is assigned when the record is built and truncated to microseconds so
/// every backend stores it without loss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    student_id: String,
    answers: [String; ANSWER_COUNT],
    feedback: Vec<Feedback>,
    created_at: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn new(submission: &Submission, feedback: &[Feedback]) -> Result<Self, PersistenceError> {
        Self::with_timestamp(submission, feedback, Utc::now())
    }

    pub fn with_timestamp(
        submission: &Submission,
        feedback: &[Feedback],
        created_at: DateTime<Utc>,
    ) -> Result<Self, PersistenceError> {
        if let Some(reason) = common::sequence_error(feedback) {
            return Err(PersistenceError::InvalidRecord(reason));
        }

        Ok(Self {
            student_id: submission.student_id().to_string(),
            answers: submission.answers().clone(),
            feedback: feedback.to_vec(),
            created_at: created_at.trunc_subsecs(6),
        })
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn answers(&self) -> &[String; ANSWER_COUNT] {
        &self.answers
    }

    pub fn feedback(&self) -> &[Feedback] {
        &self.feedback
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// One point per correct answer.
    pub fn score(&self) -> u8 {
        self.feedback
            .iter()
            .filter(|f| f.verdict.is_correct())
            .count() as u8
    }
}

/// Column layout of the `student_submissions` table, minus the generated `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRow {
    pub student_id: String,
    pub answer_1: String,
    pub answer_2: String,
    pub answer_3: String,
    pub feedback_1: String,
    pub feedback_2: String,
    pub feedback_3: String,
    pub created_at: DateTime<Utc>,
}

impl From<&SubmissionRecord> for SubmissionRow {
    fn from(record: &SubmissionRecord) -> Self {
        let [answer_1, answer_2, answer_3] = record.answers.clone();
        let column = |i: usize| record.feedback[i].to_column_text();

        Self {
            student_id: record.student_id.clone(),
            answer_1,
            answer_2,
            answer_3,
            feedback_1: column(0),
            feedback_2: column(1),
            feedback_3: column(2),
            created_at: record.created_at,
        }
    }
}

impl TryFrom<SubmissionRow> for SubmissionRecord {
    type Error = PersistenceError;

    fn try_from(row: SubmissionRow) -> Result<Self, Self::Error> {
        let columns = [&row.feedback_1, &row.feedback_2, &row.feedback_3];
        let feedback = columns
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let question = i as u8 + 1;
                Feedback::from_column_text(question, text).ok_or_else(|| {
                    PersistenceError::InvalidRecord(format!(
                        "feedback_{question} is not in 'O: ...' / 'X: ...' form"
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            student_id: row.student_id,
            answers: [row.answer_1, row.answer_2, row.answer_3],
            feedback,
            created_at: row.created_at,
        })
    }
}

/// Write-only persistence seam. Each call inserts exactly one row; there is no upsert
/// and no deduplication by student.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn save(&self, record: &SubmissionRecord) -> Result<RecordId, PersistenceError>;
}
