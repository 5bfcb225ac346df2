//! Transport seam between the chat client and the backend.
//!
//! A [`Transport`] runs raw GraphQL requests: request/response for queries and
//! mutations, a [`SubscriptionFeed`] for subscriptions. It knows nothing about
//! messages or channels.
//!
//! With the `transport` feature enabled, [`network::NetworkTransport`] talks to
//! a real backend over HTTP and WebSocket.

use std::future::Future;

use codeweek_proto::{GraphQlRequest, GraphQlResponse};
use tokio::sync::mpsc;

use crate::TransportError;

#[cfg(feature = "transport")]
pub mod network;

/// Runs GraphQL operations against a backend.
///
/// Implementations are shared between the caller and subscription delivery
/// tasks, so they must be `Send + Sync + 'static`.
pub trait Transport: Send + Sync + 'static {
    /// Run a query or mutation.
    fn execute(
        &self,
        request: GraphQlRequest,
    ) -> impl Future<Output = Result<GraphQlResponse, TransportError>> + Send;

    /// Start a subscription.
    ///
    /// Resolves once the subscription is established. Dropping the returned
    /// feed stops it upstream.
    fn subscribe(
        &self,
        request: GraphQlRequest,
    ) -> impl Future<Output = Result<SubscriptionFeed, TransportError>> + Send;
}

/// One event on a subscription feed.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// A pushed result.
    Data(GraphQlResponse),
    /// The subscription failed. Nothing follows.
    Error(TransportError),
    /// The server finished the subscription. Nothing follows.
    Complete,
}

/// Receiving end of a subscription.
#[derive(Debug)]
pub struct SubscriptionFeed {
    rx: mpsc::UnboundedReceiver<FeedEvent>,
}

impl SubscriptionFeed {
    /// Create a connected sender/feed pair.
    pub fn channel() -> (FeedSender, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (FeedSender { tx }, Self { rx })
    }

    /// Next event, or `None` once the sender is gone.
    pub async fn recv(&mut self) -> Option<FeedEvent> {
        self.rx.recv().await
    }
}

/// Producing end of a subscription, held by the transport.
#[derive(Debug, Clone)]
pub struct FeedSender {
    tx: mpsc::UnboundedSender<FeedEvent>,
}

impl FeedSender {
    /// Push an event. Returns `false` if the feed has been dropped.
    pub fn send(&self, event: FeedEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Whether the feed has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Resolves once the feed has been dropped.
    pub async fn closed(&self) {
        self.tx.closed().await;
    }
}
