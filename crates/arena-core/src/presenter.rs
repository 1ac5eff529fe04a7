//! Collaborator interfaces the client calls into, and the views it hands
//! to the presentation layer.

use arena_protocol::{Tournament, TournamentId, UserId};
use arena_transport::TransportHandle;

use crate::connection::ConnectionState;
use crate::enrichment::ProfileCache;
use crate::identity::Role;
use crate::match_view::MatchView;
use crate::session::TournamentView;

/// Title of the detail view when nothing is resolved.
pub const NO_SELECTION_TITLE: &str = "Select a tournament";
/// Status of the detail view when nothing is resolved.
pub const NO_TOURNAMENT_STATUS: &str = "No tournament";
/// Status of a started tournament.
pub const STARTING_STATUS: &str = "🏁 This tournament is starting.";

/// One entry of the tournament list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentCard {
    pub id: TournamentId,
    pub name: String,
    pub creator: String,
    pub player_count: usize,
    pub started: bool,
    pub role: Role,
    pub actions: TournamentView,
}

impl TournamentCard {
    /// Build the card of a tournament for `user`.
    #[must_use]
    pub fn build(tournament: &Tournament, user: UserId, profiles: &ProfileCache) -> Self {
        Self {
            id: tournament.id,
            name: tournament.name.clone(),
            creator: profiles.display_name(&tournament.creator),
            player_count: tournament.players.len(),
            started: tournament.started,
            role: Role::of(user, tournament),
            actions: TournamentView::derive(Some(tournament), user),
        }
    }

    /// `"1 player"`, `"3 players"`.
    #[must_use]
    pub fn players_label(&self) -> String {
        let plural = if self.player_count == 1 { "" } else { "s" };
        format!("{} player{}", self.player_count, plural)
    }
}

/// The tournament detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub tournament: Option<TournamentId>,
    pub title: String,
    pub status: String,
    pub players: Vec<String>,
    /// `None` when nothing is resolved.
    pub role: Option<Role>,
    pub actions: TournamentView,
}

impl DetailView {
    /// Build the detail view of the resolved selection for `user`.
    #[must_use]
    pub fn build(resolved: Option<&Tournament>, user: UserId, profiles: &ProfileCache) -> Self {
        let Some(t) = resolved else {
            return Self {
                tournament: None,
                title: NO_SELECTION_TITLE.to_string(),
                status: NO_TOURNAMENT_STATUS.to_string(),
                players: Vec::new(),
                role: None,
                actions: TournamentView::default(),
            };
        };

        let status = if t.started {
            STARTING_STATUS.to_string()
        } else {
            format!("Creator: {}", profiles.display_name(&t.creator))
        };

        Self {
            tournament: Some(t.id),
            title: format!("Players in \"{}\"", t.name),
            status,
            players: t.players.iter().map(|p| profiles.display_name(p)).collect(),
            role: Some(Role::of(user, t)),
            actions: TournamentView::derive(Some(t), user),
        }
    }
}

/// Rendering sink.
pub trait Presenter: Send {
    /// The tournament list changed.
    fn tournaments(&mut self, cards: &[TournamentCard]);

    /// The open detail view changed.
    fn detail(&mut self, view: &DetailView);

    /// The detail view was closed.
    fn detail_closed(&mut self);

    /// The match header changed.
    fn match_header(&mut self, view: &MatchView);

    /// The connection opened or closed.
    fn connection(&mut self, _state: ConnectionState) {}
}

/// The game engine that plays the matches.
pub trait GameEngine: Send {
    /// A `game` frame arrived, forwarded unchanged.
    fn receive(&mut self, payload: &serde_json::Value);

    /// A new connection is open; the engine sends through this handle.
    fn transport_changed(&mut self, handle: TransportHandle);
}

/// The login session.
pub trait AuthSession: Send {
    /// The server rejected the credentials.
    fn logout(&mut self);
}
