//! The tournament currently open in the detail view.
//!
//! A selection records the requested id and is resolved again against
//! every new snapshot, so the open view follows joins, starts and
//! deletions without any extra bookkeeping.

use arena_protocol::{Tournament, TournamentId, UserId};
use tracing::debug;

use crate::directory::TournamentDirectory;

/// Minimum number of players before a tournament can be started.
pub const MIN_PLAYERS_TO_START: usize = 2;

/// Action flags derived from a tournament and the local user.
///
/// Every flag is false when there is no tournament.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TournamentView {
    pub subscribed: bool,
    pub is_creator: bool,
    pub can_subscribe: bool,
    pub can_unsubscribe: bool,
    pub can_start: bool,
    pub can_delete: bool,
}

impl TournamentView {
    /// Flags for a tournament, or all false for `None`.
    #[must_use]
    pub fn derive(tournament: Option<&Tournament>, user: UserId) -> Self {
        let Some(t) = tournament else {
            return Self::default();
        };

        let subscribed = t.has_player(user);
        let is_creator = t.is_created_by(user);
        let open = !t.started;

        Self {
            subscribed,
            is_creator,
            can_subscribe: open && !subscribed,
            can_unsubscribe: open && subscribed,
            can_start: open && is_creator && t.players.len() >= MIN_PLAYERS_TO_START,
            can_delete: open && is_creator,
        }
    }

    /// Whether no action at all is available.
    #[must_use]
    pub fn has_no_actions(&self) -> bool {
        !(self.can_subscribe || self.can_unsubscribe || self.can_start || self.can_delete)
    }
}

/// Requested id plus what it resolved to in the latest snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Selection {
    requested: TournamentId,
    resolved: Option<Tournament>,
}

/// Tracks the focused tournament.
#[derive(Debug, Default)]
pub struct TournamentSession {
    selection: Option<Selection>,
}

impl TournamentSession {
    /// Create a session with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Focus a tournament and resolve it immediately.
    pub fn select(&mut self, id: TournamentId, directory: &TournamentDirectory) {
        debug!(tournament = id, "Selected tournament");
        self.selection = Some(Selection {
            requested: id,
            resolved: directory.find(id).cloned(),
        });
    }

    /// Clear the selection.
    pub fn deselect(&mut self) {
        self.selection = None;
    }

    /// Resolve the selection against a new snapshot.
    ///
    /// Returns `true` if a selection is active.
    pub fn refresh(&mut self, directory: &TournamentDirectory) -> bool {
        match self.selection.as_mut() {
            Some(selection) => {
                selection.resolved = directory.find(selection.requested).cloned();
                if selection.resolved.is_none() {
                    debug!(tournament = selection.requested, "Selected tournament is gone");
                }
                true
            }
            None => false,
        }
    }

    /// Whether a selection is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.selection.is_some()
    }

    /// The requested id, if any.
    #[must_use]
    pub fn requested(&self) -> Option<TournamentId> {
        self.selection.as_ref().map(|s| s.requested)
    }

    /// The resolved tournament, if any.
    #[must_use]
    pub fn resolved(&self) -> Option<&Tournament> {
        self.selection.as_ref().and_then(|s| s.resolved.as_ref())
    }

    /// View-model of the selection for `user`.
    #[must_use]
    pub fn view(&self, user: UserId) -> TournamentView {
        TournamentView::derive(self.resolved(), user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_protocol::Player;

    fn cup(players: Vec<Player>, started: bool) -> Tournament {
        Tournament {
            id: 1,
            name: "Cup".into(),
            creator: Player::new(9, "nina"),
            players,
            started,
        }
    }

    fn directory(list: Vec<Tournament>) -> TournamentDirectory {
        let mut dir = TournamentDirectory::new();
        dir.replace(list);
        dir
    }

    #[test]
    fn test_creator_alone_cannot_start() {
        let dir = directory(vec![cup(vec![Player::new(9, "nina")], false)]);
        let mut session = TournamentSession::new();
        session.select(1, &dir);

        let view = session.view(9);
        assert!(view.subscribed);
        assert!(view.is_creator);
        assert!(!view.can_start);
        assert!(view.can_unsubscribe);
        assert!(!view.can_subscribe);
        assert!(view.can_delete);
    }

    #[test]
    fn test_second_player_enables_start() {
        let mut dir = directory(vec![cup(vec![Player::new(9, "nina")], false)]);
        let mut session = TournamentSession::new();
        session.select(1, &dir);
        assert!(!session.view(9).can_start);

        dir.replace(vec![cup(
            vec![Player::new(9, "nina"), Player::new(4, "omar")],
            false,
        )]);
        assert!(session.refresh(&dir));
        assert!(session.view(9).can_start);
    }

    #[test]
    fn test_started_tournament_has_no_actions() {
        let dir = directory(vec![cup(
            vec![Player::new(9, "nina"), Player::new(4, "omar")],
            true,
        )]);
        let mut session = TournamentSession::new();
        session.select(1, &dir);

        assert!(session.view(9).has_no_actions());
        assert!(session.view(4).has_no_actions());
        assert!(session.view(5).has_no_actions());
        assert!(session.view(4).subscribed);
    }

    #[test]
    fn test_observer_can_only_subscribe() {
        let dir = directory(vec![cup(vec![Player::new(9, "nina")], false)]);
        let mut session = TournamentSession::new();
        session.select(1, &dir);

        let view = session.view(5);
        assert!(view.can_subscribe);
        assert!(!view.can_unsubscribe);
        assert!(!view.can_start);
        assert!(!view.can_delete);
    }

    #[test]
    fn test_unknown_id_yields_empty_view() {
        let dir = directory(vec![cup(vec![], false)]);
        let mut session = TournamentSession::new();
        session.select(42, &dir);

        assert!(session.is_active());
        assert_eq!(session.requested(), Some(42));
        assert!(session.resolved().is_none());
        assert_eq!(session.view(9), TournamentView::default());
    }

    #[test]
    fn test_deleted_tournament_unresolves_then_reappears() {
        let mut dir = directory(vec![cup(vec![], false)]);
        let mut session = TournamentSession::new();
        session.select(1, &dir);
        assert!(session.resolved().is_some());

        dir.replace(vec![]);
        session.refresh(&dir);
        assert!(session.resolved().is_none());
        assert_eq!(session.requested(), Some(1));

        dir.replace(vec![cup(vec![], false)]);
        session.refresh(&dir);
        assert!(session.resolved().is_some());
    }

    #[test]
    fn test_deselect_and_refresh_without_selection() {
        let dir = directory(vec![cup(vec![], false)]);
        let mut session = TournamentSession::new();
        assert!(!session.refresh(&dir));

        session.select(1, &dir);
        session.deselect();
        assert!(!session.is_active());
        assert!(session.requested().is_none());
        assert!(session.resolved().is_none());
    }
}
