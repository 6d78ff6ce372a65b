use thiserror::Error;

/// Terminal failures of a live-timing connection. Every variant ends the
/// current connection; per-frame decode problems are logged and dropped
/// instead, because the feed grows fields faster than clients update.
#[derive(Debug, Error, Clone)]
pub enum ClientError {
    /// Transport error or non-2xx response from `/signalr/negotiate`.
    #[error("negotiate request failed: {0}")]
    NegotiateFailed(String),

    /// The negotiate body could not be parsed.
    #[error("negotiate response could not be parsed: {0}")]
    NegotiateParseFailed(String),

    /// The negotiate body parsed but carried no connection token.
    #[error("negotiate response did not contain a connection token")]
    NegotiateNoToken,

    /// The WebSocket handshake against `/signalr/connect` failed.
    #[error("websocket dial failed: {0}")]
    DialFailed(String),

    /// The Subscribe invocation could not be written to the socket.
    #[error("failed to send subscribe frame: {0}")]
    SubscribeFailed(String),

    /// Unexpected read error while streaming.
    #[error("websocket transport failed: {0}")]
    TransportFailed(String),
}
