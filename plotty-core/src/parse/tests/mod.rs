mod csv_tests;
mod log_tests;
