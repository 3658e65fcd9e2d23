mod aggregate_tests;
mod table_tests;
