//! Rubric store: the question number → grading guideline mapping.
//!
//! Built once at startup (built-in or from a JSON file) and shared read-only
//! behind an `Arc` for the lifetime of the process.

use common::ANSWER_COUNT;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricEntry {
    pub question_number: u8,
    pub guideline_text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RubricError {
    #[error("failed to read rubric file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("rubric file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid rubric: {0}")]
    Invalid(String),
}

/// Exactly one non-empty guideline for each of questions `1..=3`, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rubric {
    entries: Vec<RubricEntry>,
}

impl Rubric {
    pub fn from_entries(mut entries: Vec<RubricEntry>) -> Result<Self, RubricError> {
        entries.sort_by_key(|e| e.question_number);

        if entries.len() != ANSWER_COUNT {
            return Err(RubricError::Invalid(format!(
                "expected {ANSWER_COUNT} entries, got {}",
                entries.len()
            )));
        }

        for (index, entry) in entries.iter().enumerate() {
            let expected = index as u8 + 1;
            if entry.question_number != expected {
                return Err(RubricError::Invalid(format!(
                    "missing or duplicate guideline for question {expected}"
                )));
            }
            if entry.guideline_text.trim().is_empty() {
                return Err(RubricError::Invalid(format!(
                    "guideline for question {expected} is empty"
                )));
            }
        }

        Ok(Self { entries })
    }

    /// Loads a JSON array of `{ "question_number", "guideline_text" }` objects.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RubricError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| RubricError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let entries: Vec<RubricEntry> = serde_json::from_str(&raw)?;
        Self::from_entries(entries)
    }

    /// The science rubric the form ships with.
    pub fn builtin() -> Self {
        let guidelines = [
            "기체의 온도가 높을수록 입자의 운동이 활발해진다(입자 운동은 온도에 비례한다)는 내용을 설명하면 정답이다.",
            "온도가 일정할 때 기체의 압력과 부피는 반비례한다(보일 법칙)는 내용을 설명하면 정답이다.",
            "전도는 이웃한 입자들이 직접 충돌하면서 열이 이동하는 현상이라는 내용을 설명하면 정답이다.",
        ];

        Self {
            entries: guidelines
                .iter()
                .enumerate()
                .map(|(i, text)| RubricEntry {
                    question_number: i as u8 + 1,
                    guideline_text: (*text).to_string(),
                })
                .collect(),
        }
    }

    pub fn entry(&self, question_number: u8) -> Option<&RubricEntry> {
        self.entries
            .iter()
            .find(|e| e.question_number == question_number)
    }

    pub fn entries(&self) -> &[RubricEntry] {
        &self.entries
    }
}
