//! GraphQL-over-JSON envelopes.
//!
//! The same request body is POSTed for queries and mutations and carried in
//! the `start` payload of a subscription.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A GraphQL request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest {
    /// Operation document.
    pub query: String,
    /// Name of the operation to run within the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    /// Variables. Absent keys are omitted, not sent as `null`.
    #[serde(default)]
    pub variables: Map<String, Value>,
}

impl GraphQlRequest {
    /// Request with no variables.
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), operation_name: None, variables: Map::new() }
    }

    /// Set the operation name.
    #[must_use]
    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// Add a variable.
    #[must_use]
    pub fn variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Variable by name.
    pub fn get_variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }
}

/// A GraphQL response body.
///
/// `data` and `errors` may both be present (partial success); callers treat
/// any error as failure of the whole operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQlResponse {
    /// Operation result. `None` when execution failed before producing data.
    #[serde(default)]
    pub data: Option<Value>,
    /// Field or request errors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQlError>,
}

impl GraphQlResponse {
    /// Successful response carrying `data`.
    pub fn with_data(data: Value) -> Self {
        Self { data: Some(data), errors: Vec::new() }
    }

    /// Failed response carrying a single error.
    pub fn with_error(message: impl Into<String>) -> Self {
        Self { data: None, errors: vec![GraphQlError::new(message)] }
    }
}

/// One entry of a response's `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    /// Human-readable description.
    pub message: String,
    /// Response path the error belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
    /// Server-specific details (Hasura puts `code` here).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl GraphQlError {
    /// Error with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), path: None, extensions: None }
    }
}

impl fmt::Display for GraphQlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
