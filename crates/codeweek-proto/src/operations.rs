//! The four operations the client runs against the `messages` table.
//!
//! Each operation pairs a fixed document with typed variables and a typed
//! `data` shape. Documents follow the Hasura naming the backend exposes
//! (`insert_messages`, `delete_messages`, `affected_rows`).

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{GraphQlRequest, MessageId, MessageRecord};

/// How an operation is transported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Request/response read.
    Query,
    /// Request/response write.
    Mutation,
    /// Long-lived push stream.
    Subscription,
}

impl OperationKind {
    /// Kind of the operation called `name`, if it is one of ours.
    pub fn of(name: &str) -> Option<Self> {
        match name {
            GetMessages::NAME => Some(GetMessages::KIND),
            ObserveMessages::NAME => Some(ObserveMessages::KIND),
            CreateMessage::NAME => Some(CreateMessage::KIND),
            DeleteMessage::NAME => Some(DeleteMessage::KIND),
            _ => None,
        }
    }

    /// Kind of a request, by its `operationName`.
    pub fn of_request(request: &GraphQlRequest) -> Option<Self> {
        request.operation_name.as_deref().and_then(Self::of)
    }
}

/// A GraphQL operation with typed variables and response data.
pub trait Operation {
    /// Shape of the response `data` object.
    type Data: DeserializeOwned;

    /// Operation name, also used as `operationName`.
    const NAME: &'static str;

    /// Transport class.
    const KIND: OperationKind;

    /// Operation document.
    const DOCUMENT: &'static str;

    /// Variables to send. Keys absent from the map are omitted on the wire.
    fn variables(&self) -> Map<String, Value>;

    /// Build the request body.
    fn request(&self) -> GraphQlRequest {
        GraphQlRequest {
            query: Self::DOCUMENT.to_string(),
            operation_name: Some(Self::NAME.to_string()),
            variables: self.variables(),
        }
    }
}

/// `data` of [`GetMessages`] and [`ObserveMessages`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagesData {
    /// Every row of the table, all channels.
    pub messages: Vec<MessageRecord>,
}

/// Fetch all messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetMessages;

impl Operation for GetMessages {
    type Data = MessagesData;

    const NAME: &'static str = "GetMessages";
    const KIND: OperationKind = OperationKind::Query;
    const DOCUMENT: &'static str =
        "query GetMessages { messages { id created channel user_name content } }";

    fn variables(&self) -> Map<String, Value> {
        Map::new()
    }
}

/// Push the full message table on every change.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObserveMessages;

impl Operation for ObserveMessages {
    type Data = MessagesData;

    const NAME: &'static str = "ObserveMessages";
    const KIND: OperationKind = OperationKind::Subscription;
    const DOCUMENT: &'static str =
        "subscription ObserveMessages { messages { id created channel user_name content } }";

    fn variables(&self) -> Map<String, Value> {
        Map::new()
    }
}

/// Insert one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMessage {
    /// Target channel.
    pub channel: String,
    /// Author. `None` omits the variable so the backend applies its default.
    pub user_name: Option<String>,
    /// Message text.
    pub content: String,
}

/// Row identifier returned by an insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertedId {
    /// UUID string.
    pub id: String,
}

/// `insert_messages` mutation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertMessagesResponse {
    /// Inserted rows.
    pub returning: Vec<InsertedId>,
}

/// `data` of [`CreateMessage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateMessageData {
    /// `None` when the backend refused the insert without an error.
    pub insert_messages: Option<InsertMessagesResponse>,
}

impl Operation for CreateMessage {
    type Data = CreateMessageData;

    const NAME: &'static str = "CreateMessage";
    const KIND: OperationKind = OperationKind::Mutation;
    const DOCUMENT: &'static str = "mutation CreateMessage($channel: String!, $user_name: String, \
         $content: String!) { insert_messages(objects: {channel: $channel, user_name: \
         $user_name, content: $content}) { returning { id } } }";

    fn variables(&self) -> Map<String, Value> {
        let mut variables = Map::new();
        variables.insert("channel".to_string(), Value::from(self.channel.clone()));
        if let Some(user_name) = &self.user_name {
            variables.insert("user_name".to_string(), Value::from(user_name.clone()));
        }
        variables.insert("content".to_string(), Value::from(self.content.clone()));
        variables
    }
}

/// Delete one message by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteMessage {
    /// Message to delete.
    pub id: MessageId,
}

/// `delete_messages` mutation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteMessagesResponse {
    /// Number of rows removed.
    pub affected_rows: u64,
}

/// `data` of [`DeleteMessage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteMessageData {
    /// `None` when the backend refused the delete without an error.
    pub delete_messages: Option<DeleteMessagesResponse>,
}

impl Operation for DeleteMessage {
    type Data = DeleteMessageData;

    const NAME: &'static str = "DeleteMessage";
    const KIND: OperationKind = OperationKind::Mutation;
    const DOCUMENT: &'static str = "mutation DeleteMessage($id: uuid!) { delete_messages(where: \
         {id: {_eq: $id}}) { affected_rows } }";

    fn variables(&self) -> Map<String, Value> {
        let mut variables = Map::new();
        variables.insert("id".to_string(), Value::from(self.id.to_string()));
        variables
    }
}
