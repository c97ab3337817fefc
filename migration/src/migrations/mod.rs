pub mod m202610160001_create_student_submissions;
