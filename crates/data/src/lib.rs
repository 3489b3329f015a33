//! Reference data access for desk matching.
//!
//! The matcher works on an immutable [`ReferenceSnapshot`] loaded fresh
//! per request. This crate provides the provider seam, a JSON directory
//! store, and deterministic demo fixtures for seeding and tests.

pub mod fixtures;
pub mod json_store;
pub mod provider;

pub use json_store::JsonSnapshotStore;
pub use provider::{DataError, ReferenceDataProvider};
