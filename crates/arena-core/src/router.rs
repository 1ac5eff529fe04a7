//! Inbound message router.
//!
//! Decodes one text frame and hands it to the directory, the selection,
//! the match coordinator or the game engine. Frames that do not decode are
//! dropped; the connection stays up.

use arena_protocol::{codec, MessageKind, ServerMessage};
use tracing::{debug, trace, warn};

use crate::directory::TournamentDirectory;
use crate::enrichment::EnrichmentRequest;
use crate::match_view::MatchCoordinator;
use crate::presenter::GameEngine;
use crate::session::TournamentSession;

/// What a frame changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    /// The directory was replaced with this many tournaments.
    Snapshot(usize),
    /// A game frame went to the engine.
    Game,
    /// A match was announced; these lookups should run.
    NextMatch([EnrichmentRequest; 2]),
    /// The live score changed.
    Score,
    /// The countdown changed.
    Countdown,
    /// Unknown message kind, ignored.
    Ignored(String),
    /// The frame could not be decoded and was dropped.
    Dropped,
}

impl Routed {
    /// Kind of the routed frame; `None` when it was dropped.
    #[must_use]
    pub fn kind(&self) -> Option<MessageKind> {
        match self {
            Routed::Snapshot(_) => Some(MessageKind::Tournaments),
            Routed::Game => Some(MessageKind::Game),
            Routed::NextMatch(_) => Some(MessageKind::NextMatch),
            Routed::Score => Some(MessageKind::TournamentUpdate),
            Routed::Countdown => Some(MessageKind::CountDown),
            Routed::Ignored(_) => Some(MessageKind::Unknown),
            Routed::Dropped => None,
        }
    }
}

/// Everything a frame can be routed to.
pub struct Targets<'a> {
    pub directory: &'a mut TournamentDirectory,
    pub session: &'a mut TournamentSession,
    pub matches: &'a mut MatchCoordinator,
    pub game: &'a mut dyn GameEngine,
}

/// Router statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouterStats {
    /// Frames decoded and dispatched.
    pub routed: u64,
    /// Frames of an unknown kind.
    pub ignored: u64,
    /// Frames that failed to decode.
    pub dropped: u64,
}

/// The inbound message router.
#[derive(Debug, Default)]
pub struct MessageRouter {
    stats: RouterStats,
}

impl MessageRouter {
    /// Create a new router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get router statistics.
    #[must_use]
    pub fn stats(&self) -> RouterStats {
        self.stats
    }

    /// Decode and route one text frame.
    pub fn route_text(&mut self, text: &str, targets: Targets<'_>) -> Routed {
        match codec::decode(text) {
            Ok(message) => self.route(message, targets),
            Err(e) => {
                warn!(error = %e, len = text.len(), "Dropping malformed frame");
                self.stats.dropped += 1;
                Routed::Dropped
            }
        }
    }

    /// Route one decoded message.
    pub fn route(&mut self, message: ServerMessage, targets: Targets<'_>) -> Routed {
        trace!(kind = message.kind().as_str(), "Routing message");

        let routed = match message {
            ServerMessage::Tournaments(snapshot) => {
                let count = snapshot.len();
                targets.directory.replace(snapshot);
                targets.session.refresh(targets.directory);
                Routed::Snapshot(count)
            }
            ServerMessage::Game(payload) => {
                targets.game.receive(&payload);
                Routed::Game
            }
            ServerMessage::NextMatch(data) => {
                let requests = targets.matches.on_next_match(&data);
                Routed::NextMatch(requests)
            }
            ServerMessage::TournamentUpdate(update) => {
                targets.matches.on_score_update(&update);
                Routed::Score
            }
            ServerMessage::CountDown { time } => {
                targets.matches.on_countdown(time);
                Routed::Countdown
            }
            ServerMessage::Unknown(kind) => {
                debug!(kind = %kind, "Ignoring unknown message type");
                self.stats.ignored += 1;
                return Routed::Ignored(kind);
            }
        };

        self.stats.routed += 1;
        routed
    }
}
