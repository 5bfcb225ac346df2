//! Channel-filtered chat client.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use codeweek_proto::{
    CreateMessage, DecodeError, DeleteMessage, GetMessages, GraphQlResponse, Message, MessageId,
    ObserveMessages, Operation, decode_channel,
};
use tracing::{debug, error, warn};

use crate::{
    ClientError, Subscription, TransportError,
    transport::{FeedEvent, Transport},
};

/// Chat client for one channel.
///
/// Translates GraphQL operations into domain [`Message`] values and keeps only
/// records posted to the configured channel. Cloning is cheap and clones
/// share the transport.
#[derive(Debug)]
pub struct ChatClient<T> {
    transport: Arc<T>,
    channel: String,
}

impl<T> Clone for ChatClient<T> {
    fn clone(&self) -> Self {
        Self { transport: Arc::clone(&self.transport), channel: self.channel.clone() }
    }
}

impl<T: Transport> ChatClient<T> {
    /// Create a client reading from and posting to `channel`.
    pub fn new(transport: T, channel: impl Into<String>) -> Self {
        Self { transport: Arc::new(transport), channel: channel.into() }
    }

    /// Channel this client is bound to.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch every message in the channel, in backend order.
    pub async fn fetch_all(&self) -> Result<Vec<Message>, ClientError> {
        let data = self.run(&GetMessages).await?;
        let messages = decode_channel(data.messages, &self.channel)?;
        debug!(count = messages.len(), "fetched messages");
        Ok(messages)
    }

    /// Post a message to the channel.
    ///
    /// With `author` set to `None` the name is left out of the request and the
    /// backend assigns its default. Returns the identifier of the new record.
    pub async fn send(&self, author: Option<&str>, content: &str) -> Result<MessageId, ClientError> {
        let op = CreateMessage {
            channel: self.channel.clone(),
            user_name: author.map(str::to_string),
            content: content.to_string(),
        };
        let data = self.run(&op).await?;
        let row = data
            .insert_messages
            .and_then(|inserted| inserted.returning.into_iter().next())
            .ok_or(DecodeError::MissingField("insert_messages.returning"))?;
        let id: MessageId = row.id.parse()?;
        debug!(%id, "message sent");
        Ok(id)
    }

    /// Delete a message by identifier.
    ///
    /// Returns whether a record was removed; `false` if it was already gone.
    pub async fn delete(&self, id: MessageId) -> Result<bool, ClientError> {
        let data = self.run(&DeleteMessage { id }).await?;
        let affected = data
            .delete_messages
            .ok_or(DecodeError::MissingField("delete_messages"))?
            .affected_rows;
        debug!(%id, affected, "delete finished");
        Ok(affected > 0)
    }

    /// Start a live subscription to the channel.
    ///
    /// Every push replaces the full message set and is handed to `on_update`.
    /// Failures go to `on_error`: transport failures end the subscription,
    /// decode failures only drop the offending push. There is no reconnect.
    ///
    /// Both callbacks run serially on a Tokio task the caller does not
    /// control. Must be called from within a Tokio runtime.
    pub fn subscribe<U, E>(&self, on_update: U, on_error: E) -> Subscription
    where
        U: FnMut(Vec<Message>) + Send + 'static,
        E: FnMut(ClientError) + Send + 'static,
    {
        let canceled = Arc::new(AtomicBool::new(false));
        let task = tokio::spawn(deliver(
            Arc::clone(&self.transport),
            self.channel.clone(),
            Arc::clone(&canceled),
            on_update,
            on_error,
        ));
        Subscription::new(canceled, task.abort_handle())
    }

    /// Like [`subscribe`](Self::subscribe), logging failures instead of
    /// reporting them.
    pub fn subscribe_updates<U>(&self, on_update: U) -> Subscription
    where
        U: FnMut(Vec<Message>) + Send + 'static,
    {
        self.subscribe(on_update, |e| error!(error = %e, "subscription failed"))
    }

    async fn run<O: Operation>(&self, op: &O) -> Result<O::Data, ClientError> {
        let response = self.transport.execute(op.request()).await?;
        decode_data::<O>(response)
    }
}

/// Extract typed `data` from a response. Any GraphQL error fails the call.
fn decode_data<O: Operation>(response: GraphQlResponse) -> Result<O::Data, ClientError> {
    if !response.errors.is_empty() {
        return Err(TransportError::GraphQl(response.errors).into());
    }
    let data = response.data.ok_or(TransportError::EmptyResponse)?;
    serde_json::from_value(data).map_err(|e| DecodeError::from(e).into())
}

async fn deliver<T, U, E>(
    transport: Arc<T>,
    channel: String,
    canceled: Arc<AtomicBool>,
    mut on_update: U,
    mut on_error: E,
) where
    T: Transport,
    U: FnMut(Vec<Message>) + Send + 'static,
    E: FnMut(ClientError) + Send + 'static,
{
    let is_canceled = || canceled.load(Ordering::Acquire);

    let mut feed = match transport.subscribe(ObserveMessages.request()).await {
        Ok(feed) => feed,
        Err(e) => {
            if !is_canceled() {
                on_error(e.into());
            }
            return;
        },
    };

    loop {
        let Some(event) = feed.recv().await else {
            debug!("subscription feed closed");
            return;
        };
        if is_canceled() {
            return;
        }
        match event {
            FeedEvent::Data(response) => {
                let snapshot = decode_data::<ObserveMessages>(response)
                    .and_then(|data| decode_channel(data.messages, &channel).map_err(Into::into));
                match snapshot {
                    // Decoding may outlast a concurrent cancel.
                    Ok(_) if is_canceled() => return,
                    Ok(messages) => on_update(messages),
                    Err(e) if e.is_decode() => {
                        warn!(error = %e, "dropping undecodable push");
                        on_error(e);
                    },
                    Err(e) => {
                        on_error(e);
                        return;
                    },
                }
            },
            FeedEvent::Error(e) => {
                on_error(e.into());
                return;
            },
            FeedEvent::Complete => {
                debug!("subscription finished by server");
                return;
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use codeweek_proto::{GraphQlError, GraphQlRequest};
    use serde_json::{Value, json};
    use tokio::sync::mpsc;

    use super::*;
    use crate::transport::{FeedSender, SubscriptionFeed};

    /// Transport answering every request with a fixed response and handing
    /// out feeds whose sender the test controls.
    #[derive(Default)]
    struct ScriptedTransport {
        response: Mutex<Option<GraphQlResponse>>,
        requests: Mutex<Vec<GraphQlRequest>>,
        feeds: Mutex<Vec<FeedSender>>,
    }

    impl ScriptedTransport {
        fn answering(response: GraphQlResponse) -> Self {
            Self { response: Mutex::new(Some(response)), ..Self::default() }
        }

        fn feed(&self) -> FeedSender {
            self.feeds.lock().unwrap()[0].clone()
        }
    }

    impl Transport for ScriptedTransport {
        async fn execute(&self, request: GraphQlRequest) -> Result<GraphQlResponse, TransportError> {
            self.requests.lock().unwrap().push(request);
            self.response.lock().unwrap().clone().ok_or(TransportError::EmptyResponse)
        }

        async fn subscribe(&self, _request: GraphQlRequest) -> Result<SubscriptionFeed, TransportError> {
            let (tx, feed) = SubscriptionFeed::channel();
            self.feeds.lock().unwrap().push(tx);
            Ok(feed)
        }
    }

    fn row(id: &str, channel: &str) -> Value {
        json!({
            "id": id,
            "created": "2019-10-12T14:03:21.123456+00:00",
            "channel": channel,
            "user_name": "alice",
            "content": "hi",
        })
    }

    const ID_A: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";
    const ID_B: &str = "7c9e6679-7425-40de-944b-e07fc1f90ae7";

    #[tokio::test]
    async fn fetch_all_filters_channel() {
        let response = GraphQlResponse::with_data(json!({
            "messages": [row(ID_A, "main"), row(ID_B, "random")]
        }));
        let client = ChatClient::new(ScriptedTransport::answering(response), "main");

        let messages = client.fetch_all().await.unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id.to_string(), ID_A);
    }

    #[tokio::test]
    async fn graphql_errors_fail_the_call() {
        let response = GraphQlResponse {
            data: Some(json!({"messages": []})),
            errors: vec![GraphQlError::new("permission denied")],
        };
        let client = ChatClient::new(ScriptedTransport::answering(response), "main");

        let err = client.fetch_all().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(TransportError::GraphQl(_))));
    }

    #[tokio::test]
    async fn missing_data_is_empty_response() {
        let client = ChatClient::new(ScriptedTransport::answering(GraphQlResponse::default()), "main");
        let err = client.fetch_all().await.unwrap_err();
        assert_eq!(err, ClientError::Transport(TransportError::EmptyResponse));
    }

    #[tokio::test]
    async fn malformed_timestamp_is_decode_error() {
        let response = GraphQlResponse::with_data(json!({
            "messages": [{"id": ID_A, "created": "yesterday", "channel": "main", "content": "x"}]
        }));
        let client = ChatClient::new(ScriptedTransport::answering(response), "main");

        let err = client.fetch_all().await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(DecodeError::Timestamp { .. })));
    }

    #[tokio::test]
    async fn send_returns_new_id_and_omits_absent_author() {
        let response = GraphQlResponse::with_data(json!({
            "insert_messages": {"returning": [{"id": ID_A}]}
        }));
        let client = ChatClient::new(ScriptedTransport::answering(response), "main");

        let id = client.send(None, "hello").await.unwrap();
        assert_eq!(id.to_string(), ID_A);

        let requests = client.transport().requests.lock().unwrap();
        assert!(requests[0].get_variable("user_name").is_none());
        assert_eq!(requests[0].get_variable("channel"), Some(&json!("main")));
    }

    #[tokio::test]
    async fn send_without_returned_row_is_decode_error() {
        let response = GraphQlResponse::with_data(json!({"insert_messages": null}));
        let client = ChatClient::new(ScriptedTransport::answering(response), "main");

        let err = client.send(Some("bob"), "hello").await.unwrap_err();
        assert_eq!(err, ClientError::Decode(DecodeError::MissingField("insert_messages.returning")));
    }

    #[tokio::test]
    async fn delete_reports_affected_rows() {
        let response =
            GraphQlResponse::with_data(json!({"delete_messages": {"affected_rows": 0}}));
        let client = ChatClient::new(ScriptedTransport::answering(response), "main");

        assert!(!client.delete(ID_A.parse().unwrap()).await.unwrap());
    }

    /// Subscribe with callbacks that forward into channels.
    fn subscribe_into(
        client: &ChatClient<ScriptedTransport>,
    ) -> (Subscription, mpsc::UnboundedReceiver<Vec<Message>>, mpsc::UnboundedReceiver<ClientError>)
    {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let (error_tx, error_rx) = mpsc::unbounded_channel();
        let subscription = client.subscribe(
            move |messages| {
                let _ = update_tx.send(messages);
            },
            move |e| {
                let _ = error_tx.send(e);
            },
        );
        (subscription, update_rx, error_rx)
    }

    async fn wait_for_feed(transport: &ScriptedTransport) {
        while transport.feeds.lock().unwrap().is_empty() {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn subscription_delivers_filtered_snapshots() {
        let client = ChatClient::new(ScriptedTransport::default(), "main");
        let (_subscription, mut updates, _errors) = subscribe_into(&client);
        wait_for_feed(client.transport()).await;

        let push = json!({"messages": [row(ID_A, "random"), row(ID_B, "main")]});
        client.transport().feed().send(FeedEvent::Data(GraphQlResponse::with_data(push)));

        let snapshot = updates.recv().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id.to_string(), ID_B);
    }

    #[tokio::test]
    async fn decode_error_keeps_subscription_alive() {
        let client = ChatClient::new(ScriptedTransport::default(), "main");
        let (subscription, mut updates, mut errors) = subscribe_into(&client);
        wait_for_feed(client.transport()).await;
        let feed = client.transport().feed();

        let bad = json!({"messages": [{"id": "nope", "created": "x", "channel": "main", "content": ""}]});
        feed.send(FeedEvent::Data(GraphQlResponse::with_data(bad)));
        assert!(errors.recv().await.unwrap().is_decode());

        feed.send(FeedEvent::Data(GraphQlResponse::with_data(json!({"messages": []}))));
        assert_eq!(updates.recv().await.unwrap(), Vec::new());
        assert!(!subscription.is_finished());
    }

    #[tokio::test]
    async fn transport_error_ends_subscription() {
        let client = ChatClient::new(ScriptedTransport::default(), "main");
        let (subscription, _updates, mut errors) = subscribe_into(&client);
        wait_for_feed(client.transport()).await;

        client.transport().feed().send(FeedEvent::Error(TransportError::Closed));
        assert_eq!(errors.recv().await.unwrap(), ClientError::Transport(TransportError::Closed));

        // The error sender is dropped with the finished task.
        assert!(errors.recv().await.is_none());
        assert!(!subscription.is_canceled());
    }

    #[tokio::test]
    async fn feed_closed_without_complete_ends_quietly() {
        let client = ChatClient::new(ScriptedTransport::default(), "main");
        let (subscription, mut updates, mut errors) = subscribe_into(&client);
        wait_for_feed(client.transport()).await;

        client.transport().feeds.lock().unwrap().clear();

        assert!(errors.recv().await.is_none());
        assert!(updates.recv().await.is_none());
        assert!(subscription.is_finished());
        assert!(!subscription.is_canceled());
    }

    #[tokio::test]
    async fn cancel_stops_delivery_and_is_idempotent() {
        let client = ChatClient::new(ScriptedTransport::default(), "main");
        let (subscription, mut updates, _errors) = subscribe_into(&client);
        wait_for_feed(client.transport()).await;
        let feed = client.transport().feed();

        subscription.cancel();
        subscription.cancel();
        assert!(subscription.is_canceled());

        feed.send(FeedEvent::Data(GraphQlResponse::with_data(json!({"messages": []}))));
        assert!(updates.recv().await.is_none());
        assert!(subscription.is_finished());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn cancel_during_pushes_stops_updates() {
        use std::sync::atomic::AtomicUsize;

        let client = ChatClient::new(ScriptedTransport::default(), "main");
        let delivered = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&delivered);
        let subscription = client.subscribe(
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            |_| {},
        );
        wait_for_feed(client.transport()).await;
        let feed = client.transport().feed();

        let push = || {
            FeedEvent::Data(GraphQlResponse::with_data(json!({"messages": [row(ID_A, "main")]})))
        };
        for _ in 0..100 {
            feed.send(push());
        }
        subscription.cancel();
        feed.closed().await;
        let after_cancel = delivered.load(Ordering::SeqCst);

        for _ in 0..10 {
            feed.send(push());
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert_eq!(delivered.load(Ordering::SeqCst), after_cancel);
        assert!(subscription.is_finished());
    }

    #[tokio::test]
    async fn dropping_handle_drops_feed() {
        let client = ChatClient::new(ScriptedTransport::default(), "main");
        let (subscription, _updates, _errors) = subscribe_into(&client);
        wait_for_feed(client.transport()).await;
        let feed = client.transport().feed();

        drop(subscription);
        feed.closed().await;
    }
}
