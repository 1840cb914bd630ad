//! Common test utilities for contract, scenario and regression tests.
//!
//! This module provides:
//! - Fixtures: record types (`Money`, `Money2`, `Currency`, `Label`, `User`)
//!   and helpers to intern them
//! - Assertion macros: `assert_same!`, `assert_distinct!`, `assert_live!`


pub use fixtures::*;
