//! Transport abstraction traits for Arena.
//!
//! A [`Connector`] opens one connection and hands back two halves: a
//! shareable [`Connection`] used for writing, and a [`FrameStream`] that
//! the owner of the event loop reads from.

use arena_protocol::{codec, ClientMessage};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Unique identifier for a connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub String);

impl ConnectionId {
    /// Create a new connection ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a connection ID from the current time.
    #[must_use]
    pub fn generate() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        Self(format!("conn_{:x}", timestamp))
    }

    /// Get the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ConnectionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection was closed.
    #[error("Connection closed")]
    ConnectionClosed,

    /// The connection could not be opened.
    #[error("Connect failed: {0}")]
    ConnectFailed(String),

    /// Failed to send data.
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// Failed to receive data.
    #[error("Receive failed: {0}")]
    ReceiveFailed(String),

    /// Protocol error.
    #[error("Protocol error: {0}")]
    Protocol(#[from] arena_protocol::ProtocolError),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// Something read from a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A text frame, not yet decoded.
    Text(String),
    /// The peer closed the connection, with its close code if one was sent.
    Closed {
        /// Close code from the close frame.
        code: Option<u16>,
    },
}

/// Writing half of an open connection.
///
/// Implementations are cheap to share: the game engine receives the same
/// handle the client sends its commands through.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Get the connection's unique identifier.
    fn id(&self) -> &ConnectionId;

    /// Send a pre-encoded text frame.
    async fn send_text(&self, text: String) -> Result<(), TransportError>;

    /// Encode and send a client message.
    async fn send(&self, message: &ClientMessage) -> Result<(), TransportError> {
        let text = codec::encode(message)?;
        self.send_text(text).await
    }

    /// Close the connection. Closing twice is not an error.
    async fn close(&self) -> Result<(), TransportError>;

    /// Check if the connection is still open.
    fn is_open(&self) -> bool;
}

/// Reading half of an open connection.
#[async_trait]
pub trait FrameStream: Send {
    /// Wait for the next text frame or the close.
    ///
    /// After `Inbound::Closed` or an error the stream must not be polled
    /// again.
    async fn recv(&mut self) -> Result<Inbound, TransportError>;
}

/// Shared handle to the writing half of the live connection.
pub type TransportHandle = Arc<dyn Connection>;

/// A freshly opened connection.
pub struct Connected {
    /// Writing half.
    pub connection: TransportHandle,
    /// Reading half.
    pub stream: Box<dyn FrameStream>,
}

/// Opens connections to a URL.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a connection and complete the handshake.
    async fn connect(&self, url: &str) -> Result<Connected, TransportError>;

    /// Get the transport name (e.g., "websocket").
    fn name(&self) -> &'static str;
}
