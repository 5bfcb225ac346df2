//! Client errors.

use codeweek_proto::{DecodeError, GraphQlError};
use thiserror::Error;

/// The transport could not complete an operation.
///
/// Never retried by the client; the caller decides what to do.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    /// Could not reach the endpoint, or the connection dropped mid-request.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Request or connect timeout elapsed.
    #[error("request timed out")]
    Timeout,

    /// Endpoint answered with a non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Http {
        /// Status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// Peer violated the wire protocol.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Backend rejected the operation.
    #[error("GraphQL error: {}", join_messages(.0))]
    GraphQl(Vec<GraphQlError>),

    /// Response carried neither data nor errors.
    #[error("response contained no data")]
    EmptyResponse,

    /// Subscription stream ended without `complete`.
    #[error("subscription closed by peer")]
    Closed,
}

fn join_messages(errors: &[GraphQlError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Any failure of a chat client operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// Network or protocol failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Response could not be decoded into messages.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl ClientError {
    /// Whether this is a decode failure. Subscriptions survive these.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

/// Invalid client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Endpoint is not a URL.
    #[error("invalid endpoint {url:?}: {reason}")]
    InvalidUrl {
        /// Value as given.
        url: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// Endpoint scheme is not `http`, `https`, `ws` or `wss`.
    #[error("unsupported scheme {0:?}")]
    UnsupportedScheme(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_error_joins_messages() {
        let err = TransportError::GraphQl(vec![GraphQlError::new("a"), GraphQlError::new("b")]);
        assert_eq!(err.to_string(), "GraphQL error: a; b");
    }

    #[test]
    fn client_error_is_transparent() {
        let err = ClientError::from(TransportError::Timeout);
        assert_eq!(err.to_string(), "request timed out");
        assert!(!err.is_decode());
        assert!(ClientError::from(DecodeError::MissingField("id")).is_decode());
    }
}
