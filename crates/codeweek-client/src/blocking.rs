//! Blocking wrapper around [`ChatClient`].

use codeweek_proto::{Message, MessageId};
use tokio::runtime::{Builder, Runtime};

use crate::{ChatClient, ClientError, Subscription, TransportError, transport::Transport};

/// Chat client whose calls block the current thread.
///
/// Owns a small multi-threaded Tokio runtime that runs requests and
/// subscription delivery. Must not be used from inside another runtime.
#[derive(Debug)]
pub struct BlockingChatClient<T> {
    inner: ChatClient<T>,
    runtime: Runtime,
}

impl<T: Transport> BlockingChatClient<T> {
    /// Wrap `client` with a private runtime.
    pub fn new(client: ChatClient<T>) -> Result<Self, TransportError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("codeweek-client")
            .enable_all()
            .build()
            .map_err(|e| TransportError::Connection(format!("runtime setup failed: {e}")))?;
        Ok(Self { inner: client, runtime })
    }

    /// Async client sharing this client's transport.
    pub fn as_async(&self) -> &ChatClient<T> {
        &self.inner
    }

    /// See [`ChatClient::fetch_all`].
    pub fn fetch_all(&self) -> Result<Vec<Message>, ClientError> {
        self.runtime.block_on(self.inner.fetch_all())
    }

    /// See [`ChatClient::send`].
    pub fn send(&self, author: Option<&str>, content: &str) -> Result<MessageId, ClientError> {
        self.runtime.block_on(self.inner.send(author, content))
    }

    /// See [`ChatClient::delete`].
    pub fn delete(&self, id: MessageId) -> Result<bool, ClientError> {
        self.runtime.block_on(self.inner.delete(id))
    }

    /// See [`ChatClient::subscribe`]. Callbacks run on the private runtime.
    pub fn subscribe<U, E>(&self, on_update: U, on_error: E) -> Subscription
    where
        U: FnMut(Vec<Message>) + Send + 'static,
        E: FnMut(ClientError) + Send + 'static,
    {
        let _guard = self.runtime.enter();
        self.inner.subscribe(on_update, on_error)
    }

    /// See [`ChatClient::subscribe_updates`].
    pub fn subscribe_updates<U>(&self, on_update: U) -> Subscription
    where
        U: FnMut(Vec<Message>) + Send + 'static,
    {
        let _guard = self.runtime.enter();
        self.inner.subscribe_updates(on_update)
    }
}
