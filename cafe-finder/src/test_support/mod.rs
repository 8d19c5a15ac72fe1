//! Test utilities for the cafe-finder crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for tests and under the `test-support` feature only.

pub mod fixtures;
pub mod map;
pub mod providers;
