mod common;
mod create_tests;
