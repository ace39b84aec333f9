//! Integration tests for the blocktrace workspace.

pub mod core_tests;
pub mod store_tests;
