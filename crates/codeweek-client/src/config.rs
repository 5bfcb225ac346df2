//! Client configuration.

use std::time::Duration;

use codeweek_proto::CHANNEL_MAIN;
use url::Url;

use crate::ConfigError;

/// Endpoint of the public Codeweek backend.
pub const DEFAULT_ENDPOINT: &str = "https://codingweek.herokuapp.com/v1/graphql";

/// Default timeout for a single query or mutation.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for establishing a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Where and how the client talks to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Endpoint for queries and mutations.
    pub http_url: Url,
    /// Endpoint for subscriptions.
    pub ws_url: Url,
    /// Channel every read is filtered to and every write is posted to.
    pub channel: String,
    /// Timeout for one query or mutation.
    pub request_timeout: Duration,
    /// Timeout for connection setup, including the subscription handshake.
    pub connect_timeout: Duration,
}

impl ClientConfig {
    /// Configuration for `http_url`, deriving the subscription endpoint by
    /// swapping `http(s)` for `ws(s)`.
    pub fn new(http_url: &str) -> Result<Self, ConfigError> {
        let http_url = parse(http_url)?;
        let ws_url = websocket_url(&http_url)?;
        Ok(Self {
            http_url,
            ws_url,
            channel: CHANNEL_MAIN.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        })
    }

    /// Override the subscription endpoint.
    pub fn with_ws_url(mut self, ws_url: &str) -> Result<Self, ConfigError> {
        let ws_url = parse(ws_url)?;
        match ws_url.scheme() {
            "ws" | "wss" => {
                self.ws_url = ws_url;
                Ok(self)
            },
            other => Err(ConfigError::UnsupportedScheme(other.to_string())),
        }
    }

    /// Override the channel.
    #[must_use]
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Override the connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

fn parse(url: &str) -> Result<Url, ConfigError> {
    Url::parse(url)
        .map_err(|e| ConfigError::InvalidUrl { url: url.to_string(), reason: e.to_string() })
}

fn websocket_url(http_url: &Url) -> Result<Url, ConfigError> {
    let scheme = match http_url.scheme() {
        "http" => "ws",
        "https" => "wss",
        other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
    };
    let mut ws_url = http_url.clone();
    ws_url
        .set_scheme(scheme)
        .map_err(|()| ConfigError::UnsupportedScheme(http_url.scheme().to_string()))?;
    Ok(ws_url)
}
