//! Chat client
//!
//! Repository-style client for the Codeweek chat backend. Runs the GraphQL
//! operations through a [`transport::Transport`], decodes the results into
//! [`Message`] values and keeps only those posted to one channel.
//!
//! # Components
//!
//! - [`ChatClient`]: async fetch, send, delete and subscribe
//! - [`BlockingChatClient`]: the same operations blocking the caller
//! - [`Subscription`]: handle to a live push stream
//! - [`ClientConfig`]: endpoints, channel and timeouts
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides
//! [`transport::network::NetworkTransport`], which speaks HTTP for queries and
//! mutations and `graphql-ws` over WebSocket for subscriptions.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod blocking;
mod client;
mod config;
mod error;
mod subscription;
pub mod transport;

pub use blocking::BlockingChatClient;
pub use client::ChatClient;
pub use codeweek_proto::{CHANNEL_MAIN, Message, MessageId};
pub use config::{ClientConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT};
pub use error::{ClientError, ConfigError, TransportError};
pub use subscription::Subscription;

/// Network client for `config`.
#[cfg(feature = "transport")]
pub fn connect(
    config: &ClientConfig,
) -> Result<ChatClient<transport::network::NetworkTransport>, TransportError> {
    let transport = transport::network::NetworkTransport::new(config)?;
    Ok(ChatClient::new(transport, config.channel.clone()))
}
