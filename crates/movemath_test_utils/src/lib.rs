//! # Movemath Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Parallel determinism harness
//! - Move def, map and world fixtures
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;

/// Re-export proptest for convenience.
pub use proptest;
