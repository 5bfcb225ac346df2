//! Backend selection.
//!
//! The TUI talks either to a real GraphQL server or to the in-process
//! simulated backend (`--simulate`). Both sit behind the same [`Transport`]
//! so the runtime is oblivious to the choice.

use codeweek_client::{
    ClientConfig, TransportError,
    transport::{SubscriptionFeed, Transport, network::NetworkTransport},
};
use codeweek_harness::SimBackend;
use codeweek_proto::{CHANNEL_MAIN, GraphQlRequest, GraphQlResponse};

/// Transport chosen at startup.
#[derive(Debug)]
pub enum Backend {
    /// HTTP and WebSocket connection to a server.
    Network(NetworkTransport),
    /// In-memory backend seeded with a few messages.
    Simulated(SimBackend),
}

impl Backend {
    /// Network backend for `config`.
    pub fn network(config: &ClientConfig) -> Result<Self, TransportError> {
        NetworkTransport::new(config).map(Self::Network)
    }

    /// Simulated backend pre-populated with a welcome conversation.
    pub fn simulated(seed: u64) -> Self {
        let backend = SimBackend::new(seed);
        backend.insert_record(CHANNEL_MAIN, Some("codeweek"), "Welcome to the simulated board");
        backend.insert_record(CHANNEL_MAIN, None, "Messages here never leave this process");
        backend.insert_record("announcements", Some("codeweek"), "Only the main channel is shown");
        Self::Simulated(backend)
    }
}

impl Transport for Backend {
    async fn execute(&self, request: GraphQlRequest) -> Result<GraphQlResponse, TransportError> {
        match self {
            Self::Network(transport) => transport.execute(request).await,
            Self::Simulated(transport) => transport.execute(request).await,
        }
    }

    async fn subscribe(&self, request: GraphQlRequest) -> Result<SubscriptionFeed, TransportError> {
        match self {
            Self::Network(transport) => transport.subscribe(request).await,
            Self::Simulated(transport) => transport.subscribe(request).await,
        }
    }
}
