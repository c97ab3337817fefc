pub mod student_submission;
