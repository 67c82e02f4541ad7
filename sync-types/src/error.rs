//! Error types for synctrack.

use thiserror::Error;

/// Errors that can occur while encoding or decoding synctrack types.
///
/// The tracker itself never fails; these only surface at the edges where
/// events and states are read from or written to text.
#[derive(Debug, Error)]
pub enum TypesError {
    /// JSON serialization failed
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// JSON deserialization failed
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),
}
