//! Owns the single connection to the game server.
//!
//! There is never more than one live connection and it is never reopened
//! automatically: after a close or an error the user has to connect again.

use arena_protocol::ClientMessage;
use arena_transport::{Connected, Connector, TransportError, TransportHandle};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::identity::UserInfo;

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// Where the game server lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Host and optional port, e.g. `pong.example:8443`.
    pub host: String,
    /// Use `wss`/`https` rather than `ws`/`http`.
    pub secure: bool,
    /// Path of the game socket.
    pub path: String,
}

impl Endpoint {
    /// Create an endpoint on the default `/game` path over TLS.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            secure: true,
            path: "/game".to_string(),
        }
    }

    /// URL of the game socket for a token.
    #[must_use]
    pub fn game_url(&self, token: &str) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        format!("{}://{}{}?token={}", scheme, self.host, self.path, token)
    }

    /// Origin of the REST API on the same host.
    #[must_use]
    pub fn http_origin(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}", scheme, self.host)
    }
}

/// Opens, tracks and closes the game connection.
pub struct ConnectionManager {
    connector: Arc<dyn Connector>,
    endpoint: Endpoint,
    handle: Option<TransportHandle>,
}

impl ConnectionManager {
    /// Create a manager that is not connected yet.
    #[must_use]
    pub fn new(connector: Arc<dyn Connector>, endpoint: Endpoint) -> Self {
        Self {
            connector,
            endpoint,
            handle: None,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        if self.handle.is_some() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    /// Open the connection and request the tournament list.
    ///
    /// Returns `None` if a connection is already open, the identity has no
    /// token, or the handshake fails. Never returns an error.
    pub async fn connect(&mut self, identity: &UserInfo) -> Option<Connected> {
        if self.handle.is_some() {
            warn!("Already connected to the game server");
            return None;
        }
        if !identity.has_token() {
            warn!(user = identity.id, "No token, not connecting to the game server");
            return None;
        }

        let url = self.endpoint.game_url(&identity.token);
        debug!(
            transport = self.connector.name(),
            host = %self.endpoint.host,
            "Connecting to the game server"
        );

        let connected = match self.connector.connect(&url).await {
            Ok(connected) => connected,
            Err(e) => {
                warn!(error = %e, "Failed to connect to the game server");
                return None;
            }
        };

        self.handle = Some(Arc::clone(&connected.connection));
        if let Err(e) = connected.connection.send(&ClientMessage::ListTournaments).await {
            warn!(error = %e, "Failed to request the tournament list");
        }

        info!(connection = %connected.connection.id(), "Connected to the game server");
        Some(connected)
    }

    /// Close the connection.
    ///
    /// Returns `true` if there was a connection to tear down. Calling this
    /// again, or before any connection, does nothing.
    pub async fn disconnect(&mut self) -> bool {
        let Some(handle) = self.handle.take() else {
            return false;
        };

        if let Err(e) = handle.close().await {
            debug!(error = %e, "Error while closing the game connection");
        }
        info!(connection = %handle.id(), "Disconnected from the game server");
        true
    }

    /// Send a message over the live connection.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ConnectionClosed`] when not connected, or
    /// the send error.
    pub async fn send(&self, message: &ClientMessage) -> Result<(), TransportError> {
        let handle = self.handle.as_ref().ok_or(TransportError::ConnectionClosed)?;
        handle.send(message).await
    }
}
