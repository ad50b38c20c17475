//! tests/mod.rs

mod handler_tests;
