//! JSON codec for Arena frames.
//!
//! Outbound messages are plain serde serialization. Inbound frames are
//! decoded in two steps: the `type` tag is read first, then the body is
//! decoded for the kinds this client understands. `game` frames are kept
//! verbatim and unknown kinds decode to [`ServerMessage::Unknown`].

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::frames::{
    ClientMessage, MatchData, MessageKind, ScoreUpdate, ServerMessage, Tournament,
};

/// Maximum accepted frame size (1 MiB).
pub const MAX_FRAME_SIZE: usize = 1024 * 1024;

/// Protocol errors that can occur during encoding/decoding.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Frame exceeds maximum size.
    #[error("Frame size {0} exceeds maximum {MAX_FRAME_SIZE}")]
    FrameTooLarge(usize),

    /// Payload is not valid JSON or does not match the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Frame is valid JSON but not an object.
    #[error("Frame is not a JSON object")]
    NotAnObject,

    /// Frame has no string `type` field.
    #[error("Frame has no type field")]
    MissingType,
}

/// Bodies of the server messages that carry structured data.
#[derive(Deserialize)]
#[serde(tag = "type")]
enum Body {
    #[serde(rename = "tournaments")]
    Tournaments { data: Vec<Tournament> },
    #[serde(rename = "nextMatch")]
    NextMatch { data: MatchData },
    #[serde(rename = "tournamentUpdate")]
    TournamentUpdate { data: ScoreUpdate },
    #[serde(rename = "countDown")]
    CountDown { time: i64 },
}

impl From<Body> for ServerMessage {
    fn from(body: Body) -> Self {
        match body {
            Body::Tournaments { data } => ServerMessage::Tournaments(data),
            Body::NextMatch { data } => ServerMessage::NextMatch(data),
            Body::TournamentUpdate { data } => ServerMessage::TournamentUpdate(data),
            Body::CountDown { time } => ServerMessage::CountDown { time },
        }
    }
}

/// Encode a client message to a JSON text frame.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(message: &ClientMessage) -> Result<String, ProtocolError> {
    let text = serde_json::to_string(message)?;
    if text.len() > MAX_FRAME_SIZE {
        return Err(ProtocolError::FrameTooLarge(text.len()));
    }
    Ok(text)
}

/// Decode a server text frame.
///
/// # Errors
///
/// Returns an error if the frame is too large, is not a JSON object with a
/// `type` field, or a known kind has a body of the wrong shape.
pub fn decode(text: &str) -> Result<ServerMessage, ProtocolError> {
    if text.len() > MAX_FRAME_SIZE {
        return Err(ProtocolError::FrameTooLarge(text.len()));
    }

    let value: Value = serde_json::from_str(text)?;
    decode_value(value)
}

/// Decode a server frame that has already been parsed as JSON.
///
/// # Errors
///
/// See [`decode`].
pub fn decode_value(value: Value) -> Result<ServerMessage, ProtocolError> {
    let tag = match &value {
        Value::Object(map) => map
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ProtocolError::MissingType)?
            .to_string(),
        _ => return Err(ProtocolError::NotAnObject),
    };

    match MessageKind::from_tag(&tag) {
        MessageKind::Game => Ok(ServerMessage::Game(value)),
        MessageKind::Unknown => Ok(ServerMessage::Unknown(tag)),
        MessageKind::Tournaments
        | MessageKind::NextMatch
        | MessageKind::TournamentUpdate
        | MessageKind::CountDown => {
            let body: Body = serde_json::from_value(value)?;
            Ok(body.into())
        }
    }
}
