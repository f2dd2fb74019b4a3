//! Error types for the diff crate.

use veld_hash::HashError;
use veld_types::TypeError;

/// Errors that can occur during diff operations.
///
/// There is no partial-failure mode: a call either produces a complete valid
/// edit program or fails with one of these. Errors are deterministic given the
/// input.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DiffError {
    /// A value could not be hashed (kind outside the modeled set).
    #[error("hashing failed: {0}")]
    Hash(#[from] HashError),

    /// A digest invariant was violated (mismatched hash width).
    #[error("digest error: {0}")]
    Digest(#[from] TypeError),

    /// An edit program did not fit the source value it was replayed against.
    #[error("invalid edit program: {0}")]
    InvalidProgram(String),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
