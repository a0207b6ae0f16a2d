//! Error types for the msmhc library.

use thiserror::Error;

/// Errors that can occur while generating candidate sequences and peptides.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A parse error occurred while reading input data.
    #[error("{0}")]
    Parse(String),

    /// A record or setting failed validation.
    /// Generators skip the offending record rather than aborting the run.
    #[error("{0}")]
    Validation(String),

    /// An output format constraint was violated.
    #[error("{0}")]
    Format(String),

    /// An internal pipeline invariant was broken upstream.
    #[error("invariant violated: {0}")]
    Invariant(String),
}
