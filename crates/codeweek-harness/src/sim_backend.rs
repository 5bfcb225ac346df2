//! In-memory backend implementing the Transport trait.
//!
//! `SimBackend` stands in for the GraphQL server. It interprets the four chat
//! operations by operation name against a record table, assigns identifiers
//! from a seeded RNG and timestamps from a monotonic simulated clock, and
//! pushes the full record set to every live subscriber after each change.
//!
//! Fault injection hooks let tests reach the failure paths a real backend
//! only hits by accident: failing the next request, writing records to other
//! channels, pushing malformed payloads, and failing every open subscription.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};
use codeweek_client::{
    TransportError,
    transport::{FeedEvent, FeedSender, SubscriptionFeed, Transport},
};
use codeweek_proto::{
    CreateMessage, DeleteMessage, GetMessages, GraphQlRequest, GraphQlResponse, MessageId,
    MessageRecord, Operation, OperationKind,
};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::{Value, json};
use tracing::{debug, trace};

/// Author stored when a message is created without `user_name`.
pub const DEFAULT_AUTHOR: &str = "anonymous";

/// First timestamp handed out by the simulated clock.
const CLOCK_START_MICROS: i64 = 1_570_889_001_000_000;

struct BackendState {
    rng: ChaCha8Rng,
    clock: DateTime<Utc>,
    records: Vec<MessageRecord>,
    subscribers: Vec<FeedSender>,
    fail_next: Option<TransportError>,
    requests: Vec<GraphQlRequest>,
}

impl BackendState {
    fn next_id(&mut self) -> MessageId {
        let mut bytes = [0u8; 16];
        self.rng.fill_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid().into()
    }

    fn next_timestamp(&mut self) -> String {
        let step = self.rng.gen_range(1_000..2_000_000);
        self.clock += TimeDelta::microseconds(step);
        self.clock.format("%Y-%m-%dT%H:%M:%S%.6f+00:00").to_string()
    }

    fn insert(&mut self, channel: &str, user_name: Option<&str>, content: &str) -> MessageId {
        let id = self.next_id();
        let created = self.next_timestamp();
        self.records.push(MessageRecord {
            id: id.to_string(),
            created,
            channel: channel.to_string(),
            user_name: Some(user_name.unwrap_or(DEFAULT_AUTHOR).to_string()),
            content: content.to_string(),
        });
        debug!(%id, channel, "inserted record");
        id
    }

    fn remove(&mut self, id: &str) -> u64 {
        let before = self.records.len();
        self.records.retain(|record| record.id != id);
        (before - self.records.len()) as u64
    }

    fn snapshot(&self) -> GraphQlResponse {
        GraphQlResponse::with_data(json!({ "messages": self.records }))
    }

    fn broadcast(&mut self, response: &GraphQlResponse) {
        self.subscribers.retain(|tx| tx.send(FeedEvent::Data(response.clone())));
        trace!(subscribers = self.subscribers.len(), "pushed snapshot");
    }

    fn publish(&mut self) {
        let snapshot = self.snapshot();
        self.broadcast(&snapshot);
    }

    fn execute(&mut self, request: &GraphQlRequest) -> GraphQlResponse {
        if OperationKind::of_request(request) == Some(OperationKind::Subscription) {
            return GraphQlResponse::with_error("subscriptions are not supported over HTTP");
        }
        match request.operation_name.as_deref() {
            Some(GetMessages::NAME) => self.snapshot(),
            Some(CreateMessage::NAME) => self.create(request),
            Some(DeleteMessage::NAME) => self.delete(request),
            other => GraphQlResponse::with_error(format!("unknown operation {other:?}")),
        }
    }

    fn create(&mut self, request: &GraphQlRequest) -> GraphQlResponse {
        let (Some(channel), Some(content)) =
            (string_variable(request, "channel"), string_variable(request, "content"))
        else {
            return GraphQlResponse::with_error("missing required variable");
        };
        let user_name = string_variable(request, "user_name");

        let id = self.insert(&channel, user_name.as_deref(), &content);
        self.publish();
        GraphQlResponse::with_data(json!({
            "insert_messages": { "returning": [{ "id": id.to_string() }] }
        }))
    }

    fn delete(&mut self, request: &GraphQlRequest) -> GraphQlResponse {
        let Some(id) = string_variable(request, "id") else {
            return GraphQlResponse::with_error("missing required variable");
        };
        if id.parse::<MessageId>().is_err() {
            return GraphQlResponse::with_error(format!("invalid input syntax for type uuid: {id:?}"));
        }

        let affected_rows = self.remove(&id);
        if affected_rows > 0 {
            self.publish();
        }
        GraphQlResponse::with_data(json!({ "delete_messages": { "affected_rows": affected_rows } }))
    }
}

fn string_variable(request: &GraphQlRequest, name: &str) -> Option<String> {
    request.get_variable(name).and_then(Value::as_str).map(str::to_string)
}

/// In-memory chat backend.
///
/// Cheap to clone; clones share the same record table and subscribers.
#[derive(Clone)]
pub struct SimBackend {
    state: Arc<Mutex<BackendState>>,
}

impl Default for SimBackend {
    fn default() -> Self {
        Self::new(0)
    }
}

impl std::fmt::Debug for SimBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("SimBackend")
            .field("records", &state.records.len())
            .field("subscribers", &state.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl SimBackend {
    /// Create an empty backend. Identifiers and timestamps are derived from
    /// `seed`.
    pub fn new(seed: u64) -> Self {
        let clock = DateTime::from_timestamp_micros(CLOCK_START_MICROS).unwrap_or_default();
        let state = BackendState {
            rng: ChaCha8Rng::seed_from_u64(seed),
            clock,
            records: Vec::new(),
            subscribers: Vec::new(),
            fail_next: None,
            requests: Vec::new(),
        };
        Self { state: Arc::new(Mutex::new(state)) }
    }

    fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All stored records, every channel, in insertion order.
    pub fn records(&self) -> Vec<MessageRecord> {
        self.lock().records.clone()
    }

    /// Every request received so far, subscriptions included.
    pub fn requests(&self) -> Vec<GraphQlRequest> {
        self.lock().requests.clone()
    }

    /// Number of subscribers whose feed is still open.
    pub fn subscriber_count(&self) -> usize {
        let mut state = self.lock();
        state.subscribers.retain(|tx| !tx.is_closed());
        state.subscribers.len()
    }

    /// Fail the next request or subscription attempt with `error`.
    pub fn fail_next_request(&self, error: TransportError) {
        self.lock().fail_next = Some(error);
    }

    /// Insert a record directly, bypassing the client. Subscribers are
    /// notified.
    pub fn insert_record(&self, channel: &str, user_name: Option<&str>, content: &str) -> MessageId {
        let mut state = self.lock();
        let id = state.insert(channel, user_name, content);
        state.publish();
        id
    }

    /// Insert a record exactly as given, without validation. Subscribers are
    /// notified.
    pub fn insert_raw_record(&self, record: MessageRecord) {
        let mut state = self.lock();
        state.records.push(record);
        state.publish();
    }

    /// Push `response` to every subscriber as if the server had sent it.
    pub fn push_raw(&self, response: GraphQlResponse) {
        self.lock().broadcast(&response);
    }

    /// End every open subscription with `error`.
    pub fn fail_subscriptions(&self, error: &TransportError) {
        let subscribers = std::mem::take(&mut self.lock().subscribers);
        debug!(count = subscribers.len(), %error, "failing subscriptions");
        for tx in subscribers {
            tx.send(FeedEvent::Error(error.clone()));
        }
    }

    /// Finish every open subscription normally.
    pub fn complete_subscriptions(&self) {
        let subscribers = std::mem::take(&mut self.lock().subscribers);
        for tx in subscribers {
            tx.send(FeedEvent::Complete);
        }
    }
}

impl Transport for SimBackend {
    async fn execute(&self, request: GraphQlRequest) -> Result<GraphQlResponse, TransportError> {
        let mut state = self.lock();
        state.requests.push(request.clone());
        if let Some(error) = state.fail_next.take() {
            return Err(error);
        }
        Ok(state.execute(&request))
    }

    async fn subscribe(&self, request: GraphQlRequest) -> Result<SubscriptionFeed, TransportError> {
        let mut state = self.lock();
        state.requests.push(request.clone());
        if let Some(error) = state.fail_next.take() {
            return Err(error);
        }
        if OperationKind::of_request(&request) != Some(OperationKind::Subscription) {
            return Err(TransportError::Protocol(format!(
                "not a subscription: {:?}",
                request.operation_name
            )));
        }

        let (tx, feed) = SubscriptionFeed::channel();
        tx.send(FeedEvent::Data(state.snapshot()));
        state.subscribers.push(tx);
        debug!(subscribers = state.subscribers.len(), "subscription started");
        Ok(feed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn create(channel: &str, user_name: Option<&str>, content: &str) -> GraphQlRequest {
        CreateMessage {
            channel: channel.to_string(),
            user_name: user_name.map(str::to_string),
            content: content.to_string(),
        }
        .request()
    }

    #[test]
    fn seeded_backends_agree() {
        let a = SimBackend::new(7);
        let b = SimBackend::new(7);
        assert_eq!(a.insert_record("main", None, "x"), b.insert_record("main", None, "x"));
        assert_eq!(a.records(), b.records());
    }

    #[test]
    fn timestamps_increase_and_carry_suffix() {
        let backend = SimBackend::new(1);
        for i in 0..20 {
            backend.insert_record("main", None, &i.to_string());
        }
        let records = backend.records();
        assert!(records.windows(2).all(|w| w[0].created < w[1].created));
        assert!(records.iter().all(|r| r.created.ends_with("+00:00") && r.created.contains('.')));
    }

    #[tokio::test]
    async fn create_without_author_stores_marker() {
        let backend = SimBackend::new(0);
        let response = backend.execute(create("main", None, "hi")).await.unwrap();
        assert!(response.errors.is_empty());
        assert_eq!(backend.records()[0].user_name.as_deref(), Some(DEFAULT_AUTHOR));
    }

    #[tokio::test]
    async fn delete_reports_affected_rows() {
        let backend = SimBackend::new(0);
        let id = backend.insert_record("main", Some("a"), "hi");

        let first = backend.execute(DeleteMessage { id }.request()).await.unwrap();
        let again = backend.execute(DeleteMessage { id }.request()).await.unwrap();
        assert_eq!(first.data, Some(json!({"delete_messages": {"affected_rows": 1}})));
        assert_eq!(again.data, Some(json!({"delete_messages": {"affected_rows": 0}})));
    }

    #[tokio::test]
    async fn unknown_operation_is_graphql_error() {
        let backend = SimBackend::new(0);
        let request = GraphQlRequest::new("{ nope }");
        let response = backend.execute(request).await.unwrap();
        assert_eq!(response.data, None);
        assert_eq!(response.errors.len(), 1);
    }

    #[tokio::test]
    async fn subscriptions_only_run_over_subscribe() {
        let backend = SimBackend::new(0);
        let observe = codeweek_proto::ObserveMessages.request();

        let response = backend.execute(observe).await.unwrap();
        assert_eq!(response.data, None);
        assert!(response.errors[0].message.contains("not supported"));

        let rejected = backend.subscribe(GetMessages.request()).await;
        assert!(matches!(rejected, Err(TransportError::Protocol(_))));
        assert_eq!(backend.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn injected_failure_hits_once() {
        let backend = SimBackend::new(0);
        backend.fail_next_request(TransportError::Timeout);

        let first = backend.execute(GetMessages.request()).await;
        let second = backend.execute(GetMessages.request()).await;
        assert_eq!(first, Err(TransportError::Timeout));
        assert!(second.is_ok());
        assert_eq!(backend.requests().len(), 2);
    }
}
