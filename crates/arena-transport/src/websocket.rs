//! WebSocket transport implementation.
//!
//! This module provides a WebSocket client using tokio-tungstenite. The
//! socket is split after the handshake: the sink goes behind a mutex in
//! [`WebSocketConnection`], the stream is owned by [`WebSocketReader`].

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, Message},
    MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, error, info, warn};

use crate::traits::{
    Connected, Connection, ConnectionId, Connector, FrameStream, Inbound, TransportError,
};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket transport configuration.
#[derive(Debug, Clone)]
pub struct WebSocketConfig {
    /// Inbound text frames larger than this are dropped.
    pub max_message_size: usize,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            max_message_size: arena_protocol::codec::MAX_FRAME_SIZE,
        }
    }
}

/// Opens WebSocket connections (`ws://` and `wss://`).
#[derive(Debug, Clone, Default)]
pub struct WebSocketConnector {
    config: WebSocketConfig,
}

impl WebSocketConnector {
    /// Create a new connector.
    #[must_use]
    pub fn new(config: WebSocketConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Connector for WebSocketConnector {
    async fn connect(&self, url: &str) -> Result<Connected, TransportError> {
        let (ws_stream, response) = connect_async(url).await.map_err(|e| {
            error!("WebSocket handshake failed: {}", e);
            TransportError::ConnectFailed(e.to_string())
        })?;

        let id = ConnectionId::generate();
        info!(connection = %id, status = %response.status(), "WebSocket connected");

        let (sink, stream) = ws_stream.split();
        let is_open = Arc::new(AtomicBool::new(true));

        let connection = WebSocketConnection {
            id,
            sink: Mutex::new(sink),
            is_open: Arc::clone(&is_open),
        };
        let reader = WebSocketReader {
            stream,
            is_open,
            max_message_size: self.config.max_message_size,
        };

        Ok(Connected {
            connection: Arc::new(connection),
            stream: Box::new(reader),
        })
    }

    fn name(&self) -> &'static str {
        "websocket"
    }
}

/// Writing half of a WebSocket connection.
pub struct WebSocketConnection {
    id: ConnectionId,
    sink: Mutex<SplitSink<WsStream, Message>>,
    is_open: Arc<AtomicBool>,
}

#[async_trait]
impl Connection for WebSocketConnection {
    fn id(&self) -> &ConnectionId {
        &self.id
    }

    async fn send_text(&self, text: String) -> Result<(), TransportError> {
        if !self.is_open.load(Ordering::SeqCst) {
            return Err(TransportError::ConnectionClosed);
        }

        let mut sink = self.sink.lock().await;
        sink.send(Message::Text(text))
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }

    async fn close(&self) -> Result<(), TransportError> {
        if !self.is_open.swap(false, Ordering::SeqCst) {
            return Ok(()); // Already closed
        }

        let mut sink = self.sink.lock().await;
        match sink.close().await {
            Ok(()) | Err(WsError::ConnectionClosed) | Err(WsError::AlreadyClosed) => Ok(()),
            Err(e) => Err(TransportError::Other(format!("Failed to close: {}", e))),
        }
    }

    fn is_open(&self) -> bool {
        self.is_open.load(Ordering::SeqCst)
    }
}

/// Reading half of a WebSocket connection.
pub struct WebSocketReader {
    stream: SplitStream<WsStream>,
    is_open: Arc<AtomicBool>,
    max_message_size: usize,
}

#[async_trait]
impl FrameStream for WebSocketReader {
    async fn recv(&mut self) -> Result<Inbound, TransportError> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    if text.len() > self.max_message_size {
                        warn!(
                            "Dropping oversized frame: {} bytes (max: {})",
                            text.len(),
                            self.max_message_size
                        );
                        continue;
                    }
                    return Ok(Inbound::Text(text));
                }
                Some(Ok(Message::Binary(data))) => {
                    // The server speaks text; accept UTF-8 binary for compatibility
                    match String::from_utf8(data) {
                        Ok(text) if text.len() <= self.max_message_size => {
                            return Ok(Inbound::Text(text));
                        }
                        Ok(_) => warn!("Dropping oversized binary frame"),
                        Err(_) => warn!("Dropping non UTF-8 binary frame"),
                    }
                }
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {
                    // tungstenite queues the pong itself
                }
                Some(Ok(Message::Close(frame))) => {
                    let code = frame.map(|f| u16::from(f.code));
                    debug!(?code, "Received close frame");
                    self.is_open.store(false, Ordering::SeqCst);
                    return Ok(Inbound::Closed { code });
                }
                Some(Ok(Message::Frame(_))) => {
                    // Raw frame, ignore
                }
                Some(Err(WsError::ConnectionClosed)) | None => {
                    debug!("WebSocket stream ended");
                    self.is_open.store(false, Ordering::SeqCst);
                    return Ok(Inbound::Closed { code: None });
                }
                Some(Err(e)) => {
                    error!("WebSocket error: {}", e);
                    self.is_open.store(false, Ordering::SeqCst);
                    return Err(TransportError::ReceiveFailed(e.to_string()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_websocket_config_default() {
        let config = WebSocketConfig::default();
        assert_eq!(config.max_message_size, arena_protocol::codec::MAX_FRAME_SIZE);
    }

    #[tokio::test]
    async fn test_connect_refused_is_an_error() {
        let connector = WebSocketConnector::default();
        // Port 9 (discard) on localhost is closed in test environments
        let result = connector.connect("ws://127.0.0.1:9/game?token=t").await;
        assert!(matches!(result, Err(TransportError::ConnectFailed(_))));
    }
}
