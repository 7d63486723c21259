mod integration_tests;
mod root_tests;
