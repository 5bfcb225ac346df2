//! Chat message domain type and its wire record.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{DecodeError, codec};

/// The only channel this client reads from and writes to.
pub const CHANNEL_MAIN: &str = "main";

/// Opaque, never-reused message identifier (UUID).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Wrap a UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&codec::encode_uuid(&self.0))
    }
}

impl FromStr for MessageId {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        codec::decode_uuid(s).map(Self)
    }
}

impl From<Uuid> for MessageId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// A chat message as delivered to the view layer.
///
/// Immutable once constructed. The backend owns the lifecycle: messages are
/// created on send and removed on delete, and the client only ever observes
/// complete snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Backend-assigned identifier.
    pub id: MessageId,
    /// Creation time (UTC by convention).
    pub created: DateTime<Utc>,
    /// Channel the message was posted to.
    pub channel: String,
    /// Display name of the author. May be empty.
    pub author: String,
    /// Message text.
    pub content: String,
}

/// A `messages` row exactly as the backend returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// UUID string.
    pub id: String,
    /// `timestamptz` string.
    pub created: String,
    /// Channel name.
    pub channel: String,
    /// Author name. Nullable in the schema.
    #[serde(default)]
    pub user_name: Option<String>,
    /// Message text.
    pub content: String,
}

impl MessageRecord {
    /// Decode scalar fields into a [`Message`].
    ///
    /// A null `user_name` becomes the empty string.
    pub fn into_message(self) -> Result<Message, DecodeError> {
        Ok(Message {
            id: self.id.parse()?,
            created: codec::decode_timestamp(&self.created)?,
            channel: self.channel,
            author: self.user_name.unwrap_or_default(),
            content: self.content,
        })
    }
}

/// Keep the records posted to `channel` and decode them, preserving backend
/// order.
///
/// Records for other channels are dropped before decoding, so a malformed row
/// elsewhere never fails this channel's snapshot.
pub fn decode_channel(
    records: Vec<MessageRecord>,
    channel: &str,
) -> Result<Vec<Message>, DecodeError> {
    records
        .into_iter()
        .filter(|record| record.channel == channel)
        .map(MessageRecord::into_message)
        .collect()
}
