//! Strict parser for the grading model's reply.
//!
//! The model is asked for exactly one JSON object:
//!
//! ```json
//! { "verdict": "correct", "explanation": "..." }
//! ```
//!
//! Anything else (prose around the object, code fences, extra keys, an unknown
//! verdict token, a blank explanation) is rejected. There is no lenient fallback.

use crate::error::MarkerError;
use common::{Feedback, Verdict};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawVerdict {
    verdict: String,
    explanation: String,
}

pub fn parse_verdict(question_number: u8, content: &str) -> Result<Feedback, MarkerError> {
    let malformed = |reason: String| MarkerError::MalformedResponse {
        question: question_number,
        reason,
    };

    let content = content.trim();
    if content.is_empty() {
        return Err(malformed("empty response".into()));
    }

    let raw: RawVerdict = serde_json::from_str(content).map_err(|e| malformed(e.to_string()))?;

    let verdict = Verdict::from_token(&raw.verdict)
        .ok_or_else(|| malformed(format!("unknown verdict '{}'", raw.verdict)))?;

    let explanation = raw.explanation.trim();
    if explanation.is_empty() {
        return Err(malformed("empty explanation".into()));
    }

    Ok(Feedback::new(question_number, verdict, explanation))
}
