//! Message types for the Arena protocol.
//!
//! Every frame on the wire is a JSON object whose `type` field names the
//! message. The server never sends deltas: a `tournaments` frame always
//! carries the full list.

use serde::{Deserialize, Serialize};

/// Identifier of a tournament, unique within a snapshot.
pub type TournamentId = u64;

/// Identifier of a user account.
pub type UserId = u64;

/// A user as it appears inside a tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Account id.
    pub id: UserId,
    /// Username at the time the snapshot was taken.
    #[serde(default)]
    pub username: String,
    /// Score, only present on match payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

impl Player {
    /// Create a player without a score.
    #[must_use]
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            score: None,
        }
    }
}

/// A tournament as last reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    /// Tournament id.
    pub id: TournamentId,
    /// Display name chosen by the creator.
    pub name: String,
    /// The user that created the tournament.
    pub creator: Player,
    /// Subscribed players in server order.
    #[serde(default)]
    pub players: Vec<Player>,
    /// Whether the tournament has been started.
    #[serde(default)]
    pub started: bool,
}

impl Tournament {
    /// Check whether a user is one of the subscribed players.
    #[must_use]
    pub fn has_player(&self, user: UserId) -> bool {
        self.players.iter().any(|p| p.id == user)
    }

    /// Check whether a user created this tournament.
    #[must_use]
    pub fn is_created_by(&self, user: UserId) -> bool {
        self.creator.id == user
    }
}

/// Payload of a `nextMatch` frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchData {
    pub player1: Player,
    pub player2: Player,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Player>,
    #[serde(default)]
    pub round: u32,
}

/// One side of a `tournamentUpdate` payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    #[serde(default)]
    pub score: u32,
}

/// Payload of a `tournamentUpdate` frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreUpdate {
    pub player1: ScoreEntry,
    pub player2: ScoreEntry,
}

/// Messages sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ask for a fresh `tournaments` snapshot.
    ListTournaments,

    /// Create a new tournament owned by the sender.
    CreateTournament {
        /// Tournament name.
        name: String,
    },

    /// Join a tournament.
    Subscribe {
        /// Target tournament.
        tournament: TournamentId,
    },

    /// Leave a tournament.
    Unsubscribe {
        /// Target tournament.
        tournament: TournamentId,
    },

    /// Start a tournament (creator only).
    StartTournament {
        /// Target tournament.
        tournament: TournamentId,
    },

    /// Delete a tournament (creator only).
    DeleteTournament {
        /// Target tournament.
        tournament: TournamentId,
    },
}

impl ClientMessage {
    /// The wire name of this message.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::ListTournaments => "list_tournaments",
            ClientMessage::CreateTournament { .. } => "create_tournament",
            ClientMessage::Subscribe { .. } => "subscribe",
            ClientMessage::Unsubscribe { .. } => "unsubscribe",
            ClientMessage::StartTournament { .. } => "start_tournament",
            ClientMessage::DeleteTournament { .. } => "delete_tournament",
        }
    }

    /// The tournament this message targets, if any.
    #[must_use]
    pub fn tournament(&self) -> Option<TournamentId> {
        match self {
            ClientMessage::Subscribe { tournament }
            | ClientMessage::Unsubscribe { tournament }
            | ClientMessage::StartTournament { tournament }
            | ClientMessage::DeleteTournament { tournament } => Some(*tournament),
            ClientMessage::ListTournaments | ClientMessage::CreateTournament { .. } => None,
        }
    }

    /// Create a CreateTournament message.
    #[must_use]
    pub fn create(name: impl Into<String>) -> Self {
        ClientMessage::CreateTournament { name: name.into() }
    }
}

/// Discriminant of a server message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Tournaments,
    Game,
    NextMatch,
    TournamentUpdate,
    CountDown,
    Unknown,
}

impl MessageKind {
    /// Map a wire `type` value to its kind.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "tournaments" => MessageKind::Tournaments,
            "game" => MessageKind::Game,
            "nextMatch" => MessageKind::NextMatch,
            "tournamentUpdate" => MessageKind::TournamentUpdate,
            "countDown" => MessageKind::CountDown,
            _ => MessageKind::Unknown,
        }
    }

    /// Label used in logs and metrics.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Tournaments => "tournaments",
            MessageKind::Game => "game",
            MessageKind::NextMatch => "nextMatch",
            MessageKind::TournamentUpdate => "tournamentUpdate",
            MessageKind::CountDown => "countDown",
            MessageKind::Unknown => "unknown",
        }
    }
}

/// Messages pushed by the server.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// Full snapshot of every tournament.
    Tournaments(Vec<Tournament>),

    /// Game-engine frame, kept verbatim (including its `type` field).
    Game(serde_json::Value),

    /// A new match is about to be played.
    NextMatch(MatchData),

    /// Live score of the current match.
    TournamentUpdate(ScoreUpdate),

    /// Seconds left before the match starts.
    CountDown {
        /// Remaining seconds; zero or below means the match is on.
        time: i64,
    },

    /// A message type this client does not know about.
    Unknown(String),
}

impl ServerMessage {
    /// Get the message kind.
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        match self {
            ServerMessage::Tournaments(_) => MessageKind::Tournaments,
            ServerMessage::Game(_) => MessageKind::Game,
            ServerMessage::NextMatch(_) => MessageKind::NextMatch,
            ServerMessage::TournamentUpdate(_) => MessageKind::TournamentUpdate,
            ServerMessage::CountDown { .. } => MessageKind::CountDown,
            ServerMessage::Unknown(_) => MessageKind::Unknown,
        }
    }
}
