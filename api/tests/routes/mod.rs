mod health_test;
mod page_test;
mod session_test;
mod startup_test;
