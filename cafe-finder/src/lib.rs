//! Search-and-selection core for nearby place discovery.
//!
//! The [`domain`] module holds the coordination layer (queries, details,
//! markers, selection, directions) behind ports; [`outbound`] provides the
//! Google, cache, geolocation, and headless map adapters; [`config`] loads
//! provider settings from the environment.

pub mod config;
pub mod domain;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
