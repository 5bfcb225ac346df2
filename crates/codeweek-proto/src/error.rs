//! Decode errors.

use thiserror::Error;

/// A value received from the backend could not be decoded.
///
/// Decoding is all-or-nothing: one malformed record fails the whole response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Timestamp did not match `yyyy-MM-dd'T'HH:mm:ss`.
    #[error("invalid timestamp {value:?}: {reason}")]
    Timestamp {
        /// Raw value as received.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// Identifier was not a UUID.
    #[error("invalid identifier {value:?}: {reason}")]
    Uuid {
        /// Raw value as received.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A field the operation requires was null or absent.
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    /// Response data did not have the expected shape.
    #[error("malformed response data: {0}")]
    Json(String),
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
