//! Error types for Higgs + jets histogramming

use thiserror::Error;

/// Error type shared by the core crates.
#[derive(Error, Debug)]
pub enum Error {
    /// Event carries no particle with the Higgs identity code.
    ///
    /// Non-fatal: the run loop skips the event and continues.
    #[error("no Higgs in entry {entry}")]
    MissingHiggs {
        /// Position of the event in the record stream.
        entry: u64,
    },

    /// Record source failed to produce a well-formed record.
    #[error("Source error: {0}")]
    Source(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Whether the run can continue past this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::MissingHiggs { .. })
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
