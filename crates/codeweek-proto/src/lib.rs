//! Codeweek wire protocol
//!
//! Types that travel between the chat client and its GraphQL backend, plus the
//! domain [`Message`] they decode into.
//!
//! # Layers
//!
//! - [`graphql`]: request/response envelopes shared by every operation
//! - [`operations`]: the four operation documents with typed variables and
//!   response data
//! - [`ws`]: the `graphql-ws` envelope used for subscriptions
//! - [`codec`]: timestamp and identifier encodings
//!
//! Nothing in this crate performs I/O.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod codec;
mod error;
pub mod graphql;
mod message;
pub mod operations;
pub mod ws;

pub use error::DecodeError;
pub use graphql::{GraphQlError, GraphQlRequest, GraphQlResponse};
pub use message::{CHANNEL_MAIN, Message, MessageId, MessageRecord, decode_channel};
pub use operations::{
    CreateMessage, DeleteMessage, GetMessages, ObserveMessages, Operation, OperationKind,
};
