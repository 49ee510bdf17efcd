mod run_tests;
mod support;
