//! Rewrite error handling.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the rewriting engine.
///
/// Remote lookups and hash lookups never fail a rewrite; only storage
/// failures and pattern compilation reach the caller.
#[derive(Error, Debug)]
pub enum RewriteError {
    /// A selected file could not be read.
    #[error("Failed to read file: {}", path.display())]
    Read {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A rewritten file could not be written back.
    #[error("Failed to write file: {}", path.display())]
    Write {
        /// Path that was being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A rewrite rule could not be compiled.
    #[error("Invalid rewrite pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
