//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **cache**: in-process detail stores
//! - **google**: Places and Routes over HTTPS, photo media URLs
//! - **geolocation**: fixed and unavailable position sources
//! - **map**: headless map surface that logs every call
//!
//! Adapters translate between domain types and provider representations and
//! hold no selection or staleness logic.

pub mod cache;
pub mod geolocation;
pub mod google;
pub mod map;
