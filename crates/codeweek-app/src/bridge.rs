//! Client-to-application translation layer.
//!
//! The [`Bridge`] wraps a [`ChatClient`] and adapts it to the application
//! lifecycle.
//!
//! # Responsibilities
//!
//! - Turns [`crate::AppAction`] requests into chat client calls and their
//!   results back into [`crate::AppEvent`]s.
//! - Starts the live subscription, whose callbacks only forward events into a
//!   channel. Every state change therefore happens on the task that drains
//!   that channel.

use codeweek_client::{ChatClient, ClientError, Subscription, transport::Transport};
use tokio::sync::mpsc;
use tracing::warn;

use crate::{AppAction, AppEvent};

/// Bridge between App and chat client.
///
/// Generic over the transport so the same code runs against the network and
/// the in-memory simulation backend.
#[derive(Debug)]
pub struct Bridge<T> {
    client: ChatClient<T>,
}

impl<T: Transport> Bridge<T> {
    /// Create a bridge over `client`.
    pub fn new(client: ChatClient<T>) -> Self {
        Self { client }
    }

    /// Underlying client.
    pub fn client(&self) -> &ChatClient<T> {
        &self.client
    }

    /// Run a client action and return resulting App events.
    ///
    /// Actions that do not involve the client produce no events.
    pub async fn process_app_action(&self, action: AppAction) -> Vec<AppEvent> {
        match action {
            AppAction::SendMessage { author, content } => {
                match self.client.send(Some(&author), &content).await {
                    Ok(id) => vec![AppEvent::MessageSent { id }],
                    Err(e) => vec![AppEvent::Error { message: format!("send failed: {e}") }],
                }
            },
            AppAction::DeleteMessage { id } => match self.client.delete(id).await {
                Ok(removed) => vec![AppEvent::MessageDeleted { id, removed }],
                Err(e) => vec![AppEvent::Error { message: format!("delete failed: {e}") }],
            },
            AppAction::Render | AppAction::Quit | AppAction::PersistName { .. } => vec![],
        }
    }

    /// Start the live subscription, forwarding pushes and failures into
    /// `events`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn subscribe(&self, events: mpsc::UnboundedSender<AppEvent>) -> Subscription {
        let errors = events.clone();
        self.client.subscribe(
            move |messages| {
                let _ = events.send(AppEvent::SnapshotReceived(messages));
            },
            move |e| {
                let _ = errors.send(feed_error_event(e));
            },
        )
    }
}

fn feed_error_event(error: ClientError) -> AppEvent {
    if error.is_decode() {
        warn!(error = %error, "dropped undecodable update");
        AppEvent::Error { message: format!("bad update: {error}") }
    } else {
        AppEvent::FeedFailed { message: error.to_string() }
    }
}
