//! # Movemath Development Tools
//!
//! Command-line tools for development:
//! - Move data validators
//! - Session checksum reports

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod validate;
