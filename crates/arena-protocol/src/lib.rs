//! # arena-protocol
//!
//! Wire protocol definitions for the Arena tournament client.
//!
//! Frames are JSON text objects discriminated by their `type` field.
//!
//! ## Client messages
//!
//! - `list_tournaments` / `create_tournament` - Directory requests
//! - `subscribe` / `unsubscribe` - Membership
//! - `start_tournament` / `delete_tournament` - Creator actions
//!
//! ## Server messages
//!
//! - `tournaments` - Full snapshot of every tournament
//! - `game` - Opaque game-engine frame
//! - `nextMatch` / `tournamentUpdate` / `countDown` - Live match events
//!
//! ## Example
//!
//! ```rust
//! use arena_protocol::{codec, ClientMessage, ServerMessage};
//!
//! let text = codec::encode(&ClientMessage::ListTournaments).unwrap();
//! assert_eq!(text, r#"{"type":"list_tournaments"}"#);
//!
//! let msg = codec::decode(r#"{"type":"countDown","time":3}"#).unwrap();
//! assert_eq!(msg, ServerMessage::CountDown { time: 3 });
//! ```

pub mod close;
pub mod codec;
pub mod frames;

pub use close::CloseReason;
pub use codec::{decode, encode, ProtocolError};
pub use frames::{
    ClientMessage, MatchData, MessageKind, Player, ScoreEntry, ScoreUpdate, ServerMessage,
    Tournament, TournamentId, UserId,
};
