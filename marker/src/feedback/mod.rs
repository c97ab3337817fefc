pub mod ai_feedback;
