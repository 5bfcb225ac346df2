//! HTTP and WebSocket transport.
//!
//! Queries and mutations are POSTed as JSON. Each subscription opens its own
//! WebSocket speaking the `graphql-ws` subprotocol; a background task pumps
//! frames into the [`SubscriptionFeed`] until the server completes, the
//! connection fails, or the feed is dropped.

use codeweek_proto::{
    GraphQlRequest, GraphQlResponse,
    ws::{ClientMessage, SUBPROTOCOL, ServerMessage},
};
use futures::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use tokio::{net::TcpStream, time::timeout};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{self, Message as WsMessage, client::IntoClientRequest, http::HeaderValue},
};
use tracing::{debug, warn};
use url::Url;

use super::{FeedEvent, FeedSender, SubscriptionFeed, Transport};
use crate::{ClientConfig, TransportError};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, WsMessage>;
type WsSource = SplitStream<WsStream>;

/// Operation id used on every socket. One socket carries one subscription.
const OPERATION_ID: &str = "1";

/// Transport backed by a real GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct NetworkTransport {
    http: reqwest::Client,
    http_url: Url,
    ws_url: Url,
    connect_timeout: std::time::Duration,
}

impl NetworkTransport {
    /// Build a transport for the endpoints in `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| TransportError::Connection(format!("HTTP client setup failed: {e}")))?;

        Ok(Self {
            http,
            http_url: config.http_url.clone(),
            ws_url: config.ws_url.clone(),
            connect_timeout: config.connect_timeout,
        })
    }

    async fn post(&self, request: GraphQlRequest) -> Result<GraphQlResponse, TransportError> {
        let response = self
            .http
            .post(self.http_url.clone())
            .json(&request)
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Http { status: status.as_u16(), body });
        }

        response
            .json::<GraphQlResponse>()
            .await
            .map_err(|e| TransportError::Protocol(format!("invalid response body: {e}")))
    }

    async fn open(&self, request: GraphQlRequest) -> Result<SubscriptionFeed, TransportError> {
        let mut ws_request = self
            .ws_url
            .as_str()
            .into_client_request()
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        ws_request
            .headers_mut()
            .insert("Sec-WebSocket-Protocol", HeaderValue::from_static(SUBPROTOCOL));

        let (stream, _) = connect_async(ws_request)
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        let (mut sink, mut source) = stream.split();

        send_frame(&mut sink, &ClientMessage::init()).await?;
        await_ack(&mut source).await?;
        let start = ClientMessage::Start { id: OPERATION_ID.to_string(), payload: request };
        send_frame(&mut sink, &start).await?;

        debug!(url = %self.ws_url, "subscription connected");

        let (tx, feed) = SubscriptionFeed::channel();
        tokio::spawn(pump(sink, source, tx));
        Ok(feed)
    }
}

impl Transport for NetworkTransport {
    async fn execute(&self, request: GraphQlRequest) -> Result<GraphQlResponse, TransportError> {
        self.post(request).await
    }

    async fn subscribe(&self, request: GraphQlRequest) -> Result<SubscriptionFeed, TransportError> {
        timeout(self.connect_timeout, self.open(request))
            .await
            .map_err(|_| TransportError::Timeout)?
    }
}

fn http_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Connection(err.to_string())
    }
}

async fn send_frame(sink: &mut WsSink, frame: &ClientMessage) -> Result<(), TransportError> {
    let text = frame.to_text().map_err(|e| TransportError::Protocol(e.to_string()))?;
    sink.send(WsMessage::Text(text))
        .await
        .map_err(|e| TransportError::Connection(e.to_string()))
}

/// Wait for `connection_ack`, skipping keep-alives.
async fn await_ack(source: &mut WsSource) -> Result<(), TransportError> {
    while let Some(frame) = source.next().await {
        let frame = frame.map_err(|e| TransportError::Connection(e.to_string()))?;
        let WsMessage::Text(text) = frame else {
            continue;
        };
        match ServerMessage::from_text(&text) {
            Ok(ServerMessage::ConnectionAck) => return Ok(()),
            Ok(ServerMessage::Ka) => {},
            Ok(ServerMessage::ConnectionError { payload }) => {
                return Err(TransportError::Protocol(format!(
                    "connection rejected: {}",
                    ServerMessage::describe_payload(&payload)
                )));
            },
            Ok(other) => {
                return Err(TransportError::Protocol(format!(
                    "expected connection_ack, got {other:?}"
                )));
            },
            Err(e) => return Err(TransportError::Protocol(format!("invalid frame: {e}"))),
        }
    }
    Err(TransportError::Closed)
}

/// Forward server frames into the feed until the subscription ends.
async fn pump(mut sink: WsSink, mut source: WsSource, tx: FeedSender) {
    loop {
        tokio::select! {
            () = tx.closed() => {
                stop(&mut sink).await;
                return;
            }
            frame = source.next() => {
                let Some(event) = translate(frame) else {
                    continue;
                };
                let terminal = !matches!(event, FeedEvent::Data(_));
                if !tx.send(event) {
                    stop(&mut sink).await;
                    return;
                }
                if terminal {
                    let _ = sink.close().await;
                    return;
                }
            }
        }
    }
}

/// Map one socket read to a feed event. `None` means nothing to deliver.
fn translate(frame: Option<Result<WsMessage, tungstenite::Error>>) -> Option<FeedEvent> {
    match frame {
        Some(Ok(WsMessage::Text(text))) => match ServerMessage::from_text(&text) {
            Ok(ServerMessage::Data { payload, .. }) => Some(FeedEvent::Data(payload)),
            Ok(ServerMessage::Ka | ServerMessage::ConnectionAck) => None,
            Ok(ServerMessage::Complete { .. }) => {
                debug!("subscription completed");
                Some(FeedEvent::Complete)
            },
            Ok(ServerMessage::Error { payload, .. } | ServerMessage::ConnectionError { payload }) => {
                Some(FeedEvent::Error(TransportError::Protocol(ServerMessage::describe_payload(
                    &payload,
                ))))
            },
            Err(e) => {
                warn!(error = %e, "unparseable subscription frame");
                Some(FeedEvent::Error(TransportError::Protocol(format!("invalid frame: {e}"))))
            },
        },
        Some(Ok(WsMessage::Close(_))) | None => {
            debug!("subscription socket closed");
            Some(FeedEvent::Error(TransportError::Closed))
        },
        Some(Ok(_)) => None,
        Some(Err(e)) => Some(FeedEvent::Error(TransportError::Connection(e.to_string()))),
    }
}

/// Stop the operation and close the session. Failures are only logged; the
/// socket is being abandoned either way.
async fn stop(sink: &mut WsSink) {
    let frames =
        [ClientMessage::Stop { id: OPERATION_ID.to_string() }, ClientMessage::ConnectionTerminate];
    for frame in frames {
        if let Err(e) = send_frame(sink, &frame).await {
            debug!(error = %e, "failed to stop subscription cleanly");
            break;
        }
    }
    let _ = sink.close().await;
    debug!("subscription terminated");
}
