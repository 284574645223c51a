//! Error types for shaon operations.
//!
//! The extraction pipeline itself never returns these to its callers; they
//! describe failures at the edges (parsing user-supplied clock strings, or a
//! fallback date searcher giving up).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShaonError {
    #[error("Invalid clock time: {0}")]
    InvalidClockTime(String),
}

/// Failure reported by an external date searcher.
#[derive(Error, Debug)]
pub enum FallbackError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Date searcher panicked")]
    Panicked,
}
