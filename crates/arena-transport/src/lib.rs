//! # arena-transport
//!
//! Client transport abstraction for the Arena tournament client.
//!
//! - **WebSocket** - `ws://` and `wss://` via tokio-tungstenite
//!
//! ## Transport Abstraction
//!
//! A [`Connector`] yields a shareable writing half and a reading half, so
//! the event loop can wait on inbound frames while other parts of the
//! client (the game engine, the command dispatcher) keep sending.
//!
//! ```rust,ignore
//! use arena_transport::{Connector, Inbound, WebSocketConnector};
//!
//! async fn run(url: &str) {
//!     let connected = WebSocketConnector::default().connect(url).await.unwrap();
//!     let mut stream = connected.stream;
//!     while let Ok(Inbound::Text(text)) = stream.recv().await {
//!         // Process frame
//!     }
//! }
//! ```

pub mod traits;

#[cfg(feature = "websocket")]
pub mod websocket;

pub use traits::{
    Connected, Connection, ConnectionId, Connector, FrameStream, Inbound, TransportError,
    TransportHandle,
};

#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConfig, WebSocketConnector};
