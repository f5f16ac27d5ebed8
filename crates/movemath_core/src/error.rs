//! Error types for move-def loading and registry lookups.
//!
//! The query path itself never fails: off-map cells are skipped and ranges
//! are clamped. Only data loading produces errors.

use thiserror::Error;

/// Result type alias using [`MoveError`].
pub type Result<T> = std::result::Result<T, MoveError>;

/// Top-level error type for the movement crate.
#[derive(Debug, Error)]
pub enum MoveError {
    /// Data file could not be read.
    #[error("Failed to read data file '{path}': {source}")]
    IoError {
        /// Path of the file.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Data file parsing error.
    #[error("Failed to parse data file '{path}': {message}")]
    DataParseError {
        /// Path (or label) of the source that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// Two move defs share the same (lowercased) name.
    #[error("Duplicate move def name: {0}")]
    DuplicateMoveDef(String),

    /// More move defs were supplied than the registry can address.
    #[error("Too many move defs: {count} (max {max})")]
    TooManyMoveDefs {
        /// Number of definitions supplied.
        count: usize,
        /// Maximum number of definitions supported.
        max: usize,
    },

    /// Lookup of a move def by name failed.
    #[error("Unknown move def: {0}")]
    UnknownMoveDef(String),

    /// Terrain data is inconsistent (e.g. mismatched layer sizes).
    #[error("Invalid terrain: {0}")]
    InvalidTerrain(String),
}
