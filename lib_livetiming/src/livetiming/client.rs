//! The transport: SignalR negotiate, WebSocket dial, subscribe, and the
//! receive loop that drives the rest of the module.

use std::collections::HashMap;

use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::protocol::{Message, WebSocketConfig};
use url::Url;

use crate::domain::{Driver, Meeting, RaceCtrlMsg};
use crate::livetiming::error::ClientError;
use crate::livetiming::merge::{self, Dirty};
use crate::livetiming::publisher::Publisher;
use crate::livetiming::store::SessionStore;
use crate::livetiming::wire::{self, Frame};

/// The SignalR connection descriptor the server expects on both the
/// negotiate and connect requests.
const CONNECTION_DATA: &str = r#"[{"Name":"Streaming"}]"#;
const CLIENT_PROTOCOL: &str = "1.5";

/// Endpoint configuration. The defaults point at the production feed;
/// overriding both URLs is primarily for tests against a local server.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub http_base_url: String,
    pub ws_base_url: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        ClientOptions {
            http_base_url: "https://livetiming.formula1.com".to_string(),
            ws_base_url: "wss://livetiming.formula1.com".to_string(),
        }
    }
}

/// Receiving ends of the snapshot channels, handed to the consumer task.
///
/// Each channel delivers deep-copied state in mutation order. `done` yields
/// at most one terminal error and then closes; a close without an error is
/// a graceful shutdown.
pub struct Snapshots {
    pub meetings: mpsc::Receiver<Meeting>,
    pub drivers: mpsc::Receiver<HashMap<String, Driver>>,
    pub race_ctrl_msgs: mpsc::Receiver<RaceCtrlMsg>,
    pub done: mpsc::Receiver<ClientError>,
}

/// The live-timing client. Owns the session store and the sending halves
/// of the snapshot channels; consumed by [`Client::listen`].
pub struct Client {
    options: ClientOptions,
    store: SessionStore,
    publisher: Publisher,
    done_tx: mpsc::Sender<ClientError>,
    connection_token: String,
    cookie: String,
}

impl Client {
    /// Creates a client and the snapshot receivers for the consumer task.
    pub fn new(options: ClientOptions) -> (Client, Snapshots) {
        let (publisher, receivers) = Publisher::channel();
        let (done_tx, done) = mpsc::channel(1);
        let client = Client {
            options,
            store: SessionStore::new(),
            publisher,
            done_tx,
            connection_token: String::new(),
            cookie: String::new(),
        };
        let snapshots = Snapshots {
            meetings: receivers.meetings,
            drivers: receivers.drivers,
            race_ctrl_msgs: receivers.race_ctrl_msgs,
            done,
        };
        (client, snapshots)
    }

    /// Connects and streams until the server closes, an error occurs, or
    /// `shutdown` fires. A terminal error is written to `done` before the
    /// channels close; cancellation and a server-side normal closure both
    /// surface as a clean close.
    pub async fn listen(mut self, shutdown: broadcast::Receiver<()>) {
        match self.run(shutdown).await {
            Ok(()) => log::info!("live timing connection closed"),
            Err(err) => {
                log::error!("live timing connection failed: {err}");
                let _ = self.done_tx.send(err).await;
            }
        }
        // Dropping self drops every sender; consumers observe the close.
    }

    async fn run(&mut self, mut shutdown: broadcast::Receiver<()>) -> Result<(), ClientError> {
        self.negotiate().await?;

        let request = self.connect_request()?;
        // The reference frame alone can run to several megabytes; the
        // default read limits would kill the connection mid-handshake.
        let ws_config = WebSocketConfig {
            max_message_size: None,
            max_frame_size: None,
            ..Default::default()
        };
        let (ws, _) = tokio_tungstenite::connect_async_with_config(request, Some(ws_config), false)
            .await
            .map_err(|e| ClientError::DialFailed(e.to_string()))?;
        log::info!("connected to live timing stream");
        let (mut write, mut read) = ws.split();

        write
            .send(Message::Text(subscribe_frame()))
            .await
            .map_err(|e| ClientError::SubscribeFailed(e.to_string()))?;

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    log::info!("shutdown requested; closing live timing socket");
                    let _ = write.send(Message::Close(None)).await;
                    return Ok(());
                }
                msg = read.next() => match msg {
                    Some(Ok(Message::Text(text))) => self.process_frame(&text).await,
                    Some(Ok(Message::Close(_))) | None => {
                        log::info!("server closed the live timing stream");
                        return Ok(());
                    }
                    Some(Ok(_)) => {} // ping/pong/binary carry no timing data
                    Some(Err(e)) => return Err(ClientError::TransportFailed(e.to_string())),
                }
            }
        }
    }

    /// Classifies and applies one raw text frame, then fans out snapshots
    /// for whatever the frame dirtied. Public so recorded sessions can be
    /// replayed through the exact path the live transport uses.
    pub async fn process_frame(&mut self, raw: &str) {
        match wire::classify(raw) {
            Frame::Change(updates) => {
                let mut dirty = Dirty::default();
                for update in updates {
                    dirty |= merge::apply_topic(&mut self.store, &update.topic, update.payload);
                }
                self.publisher.publish(&self.store, dirty).await;
            }
            Frame::Reference(updates) => {
                log::debug!("received reference snapshot ({} topics)", updates.len());
                for update in updates {
                    merge::apply_topic(&mut self.store, &update.topic, update.payload);
                }
                // The reference is the initial state for every consumer.
                self.publisher.publish(&self.store, Dirty::ALL).await;
            }
            Frame::Unknown => log::debug!("dropping unrecognized frame: {raw}"),
        }
    }

    async fn negotiate(&mut self) -> Result<(), ClientError> {
        let url = format!(
            "{}/signalr/negotiate",
            self.options.http_base_url.trim_end_matches('/')
        );
        let response = reqwest::Client::new()
            .post(&url)
            .query(&[("connectionData", CONNECTION_DATA), ("clientProtocol", CLIENT_PROTOCOL)])
            .send()
            .await
            .map_err(|e| ClientError::NegotiateFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::NegotiateFailed(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        // The cookie must be echoed verbatim on the WebSocket dial.
        self.cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let body: NegotiateResponse = response
            .json()
            .await
            .map_err(|e| ClientError::NegotiateParseFailed(e.to_string()))?;
        if body.connection_token.is_empty() {
            return Err(ClientError::NegotiateNoToken);
        }
        log::debug!(
            "negotiated connection (token length {}, keep-alive {}s, disconnect {}s)",
            body.connection_token.len(),
            body.keep_alive_timeout,
            body.disconnect_timeout,
        );
        self.connection_token = body.connection_token;
        Ok(())
    }

    fn connect_request(
        &self,
    ) -> Result<tokio_tungstenite::tungstenite::handshake::client::Request, ClientError> {
        let mut url = Url::parse(&self.options.ws_base_url)
            .map_err(|e| ClientError::DialFailed(format!("invalid ws base url: {e}")))?;
        url.set_path("/signalr/connect");
        url.query_pairs_mut()
            .append_pair("connectionData", CONNECTION_DATA)
            .append_pair("connectionToken", &self.connection_token)
            .append_pair("clientProtocol", CLIENT_PROTOCOL)
            .append_pair("transport", "webSockets");

        let mut request = url
            .as_str()
            .into_client_request()
            .map_err(|e| ClientError::DialFailed(e.to_string()))?;
        let headers = request.headers_mut();
        // Ossified server expectations: the feed rejects dials that do not
        // look like the official client.
        headers.insert(header::USER_AGENT, HeaderValue::from_static("BestHTTP"));
        headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("gzip,identity"));
        if !self.cookie.is_empty() {
            let value = HeaderValue::from_str(&self.cookie)
                .map_err(|e| ClientError::DialFailed(format!("invalid negotiate cookie: {e}")))?;
            headers.insert(header::COOKIE, value);
        }
        Ok(request)
    }
}

/// The one frame this client ever originates: a hub invocation subscribing
/// to the topics the model consumes. The compressed telemetry topics
/// (`CarData.z`, `Position.z`) are deliberately left out.
fn subscribe_frame() -> String {
    serde_json::json!({
        "H": "Streaming",
        "M": "Subscribe",
        "A": [[
            "Heartbeat",
            "TimingStats",
            "TimingAppData",
            "TrackStatus",
            "DriverList",
            "RaceControlMessages",
            "SessionInfo",
            "SessionData",
            "LapCount",
            "TimingData",
        ]],
        "I": "1",
    })
    .to_string()
}

/// Body of the negotiate response. Only the token is load-bearing; the
/// timeouts are informational.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
struct NegotiateResponse {
    #[serde(rename = "Url")]
    url: String,
    #[serde(rename = "ConnectionToken")]
    connection_token: String,
    #[serde(rename = "ConnectionId")]
    connection_id: String,
    #[serde(rename = "KeepAliveTimeout")]
    keep_alive_timeout: f64,
    #[serde(rename = "DisconnectTimeout")]
    disconnect_timeout: f64,
    #[serde(rename = "ConnectionTimeout")]
    connection_timeout: f64,
    #[serde(rename = "TryWebSockets")]
    try_web_sockets: bool,
    #[serde(rename = "ProtocolVersion")]
    protocol_version: String,
    #[serde(rename = "TransportConnectTimeout")]
    transport_connect_timeout: f64,
    #[serde(rename = "LongPollDelay")]
    long_poll_delay: f64,
}
