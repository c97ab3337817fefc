//! Per-question grading results.

use crate::submission::ANSWER_COUNT;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary correctness judgment for one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Correct,
    Incorrect,
}

impl Verdict {
    /// Parses the exact verdict token (case-insensitive, surrounding whitespace ignored).
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "correct" => Some(Verdict::Correct),
            "incorrect" => Some(Verdict::Incorrect),
            _ => None,
        }
    }

    /// Single-letter mark used in the persisted feedback columns.
    pub fn mark(self) -> char {
        match self {
            Verdict::Correct => 'O',
            Verdict::Incorrect => 'X',
        }
    }

    pub fn from_mark(mark: char) -> Option<Self> {
        match mark {
            'O' => Some(Verdict::Correct),
            'X' => Some(Verdict::Incorrect),
            _ => None,
        }
    }

    pub fn is_correct(self) -> bool {
        self == Verdict::Correct
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Correct => write!(f, "correct"),
            Verdict::Incorrect => write!(f, "incorrect"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub question_number: u8,
    pub verdict: Verdict,
    pub explanation: String,
}

impl Feedback {
    pub fn new(question_number: u8, verdict: Verdict, explanation: impl Into<String>) -> Self {
        Self {
            question_number,
            verdict,
            explanation: explanation.into(),
        }
    }

    /// Column text: `"O: <explanation>"` or `"X: <explanation>"`.
    pub fn to_column_text(&self) -> String {
        format!("{}: {}", self.verdict.mark(), self.explanation)
    }

    /// Inverse of [`Feedback::to_column_text`]. Returns `None` unless the text starts
    /// with exactly `O: ` or `X: `.
    pub fn from_column_text(question_number: u8, text: &str) -> Option<Self> {
        let mut chars = text.chars();
        let verdict = Verdict::from_mark(chars.next()?)?;
        let explanation = chars.as_str().strip_prefix(": ")?;
        Some(Self::new(question_number, verdict, explanation))
    }
}

/// Describes why `feedback` is not exactly one entry per answer numbered `1..=3` in
/// order, or returns `None` when it is.
pub fn sequence_error(feedback: &[Feedback]) -> Option<String> {
    if feedback.len() != ANSWER_COUNT {
        return Some(format!(
            "expected {ANSWER_COUNT} entries, got {}",
            feedback.len()
        ));
    }

    feedback
        .iter()
        .enumerate()
        .find(|(index, entry)| usize::from(entry.question_number) != index + 1)
        .map(|(index, entry)| {
            format!(
                "entry {index} is for question {}, expected {}",
                entry.question_number,
                index + 1
            )
        })
}
