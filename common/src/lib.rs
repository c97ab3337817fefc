//! Value types shared by every crate in the workspace: the submission form and the
//! per-question feedback produced by grading.

pub mod feedback;
pub mod submission;

pub use feedback::{Feedback, Verdict, sequence_error};
pub use submission::{ANSWER_COUNT, Submission, SubmissionForm, ValidationError};

