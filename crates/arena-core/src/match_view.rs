//! Live match header: who plays, the score, and the countdown.

use arena_protocol::{MatchData, ScoreUpdate, UserId};
use tracing::debug;

use crate::enrichment::{EnrichmentRequest, UserProfile};

/// Countdown text once the remaining time reaches zero.
pub const COUNTDOWN_GO: &str = "Go!";

/// Side of the match header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Player1,
    Player2,
}

/// One side of the match header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerSlot {
    /// Id of the player, set as soon as the match is announced.
    pub user: Option<UserId>,
    /// Display name, filled in by enrichment.
    pub name: String,
    /// Avatar URL, filled in by enrichment.
    pub avatar: Option<String>,
}

/// Which of the two mutually exclusive displays is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchDisplay {
    Score,
    Countdown,
}

/// Display state of the match header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchView {
    pub player1: PlayerSlot,
    pub player2: PlayerSlot,
    pub round: u32,
    /// Score text, `"<p1> - <p2>"`.
    pub score: String,
    /// Countdown text, seconds left or [`COUNTDOWN_GO`].
    pub countdown: Option<String>,
    /// `None` until the first match is announced.
    pub display: Option<MatchDisplay>,
}

impl MatchView {
    /// Whether the score is the visible display.
    #[must_use]
    pub fn score_visible(&self) -> bool {
        self.display == Some(MatchDisplay::Score)
    }

    /// Whether the countdown is the visible display.
    #[must_use]
    pub fn countdown_visible(&self) -> bool {
        self.display == Some(MatchDisplay::Countdown)
    }

    /// Get a slot.
    #[must_use]
    pub fn slot(&self, slot: Slot) -> &PlayerSlot {
        match slot {
            Slot::Player1 => &self.player1,
            Slot::Player2 => &self.player2,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut PlayerSlot {
        match slot {
            Slot::Player1 => &mut self.player1,
            Slot::Player2 => &mut self.player2,
        }
    }
}

/// Format a score pair.
#[must_use]
pub fn score_text(player1: u32, player2: u32) -> String {
    format!("{} - {}", player1, player2)
}

/// Format remaining countdown seconds.
#[must_use]
pub fn countdown_text(time: i64) -> String {
    if time <= 0 {
        COUNTDOWN_GO.to_string()
    } else {
        time.to_string()
    }
}

/// Applies live match events to the [`MatchView`].
#[derive(Debug, Default)]
pub struct MatchCoordinator {
    view: MatchView,
}

impl MatchCoordinator {
    /// Create a coordinator with no match.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current display state.
    #[must_use]
    pub fn view(&self) -> &MatchView {
        &self.view
    }

    /// A new match is announced.
    ///
    /// Player ids are set right away; names and avatars keep their previous
    /// value until the returned lookups complete.
    pub fn on_next_match(&mut self, data: &MatchData) -> [EnrichmentRequest; 2] {
        debug!(
            player1 = data.player1.id,
            player2 = data.player2.id,
            round = data.round,
            "Next match"
        );

        self.view.player1.user = Some(data.player1.id);
        self.view.player2.user = Some(data.player2.id);
        self.view.round = data.round;
        self.view.score = score_text(
            data.player1.score.unwrap_or(0),
            data.player2.score.unwrap_or(0),
        );
        if self.view.display.is_none() {
            self.view.display = Some(MatchDisplay::Score);
        }

        [
            EnrichmentRequest::match_slot(data.player1.id, Slot::Player1),
            EnrichmentRequest::match_slot(data.player2.id, Slot::Player2),
        ]
    }

    /// Live score changed: show the score, hide the countdown.
    pub fn on_score_update(&mut self, update: &ScoreUpdate) {
        self.view.score = score_text(update.player1.score, update.player2.score);
        self.view.display = Some(MatchDisplay::Score);
    }

    /// Countdown tick: show the countdown, hide the score.
    pub fn on_countdown(&mut self, time: i64) {
        self.view.countdown = Some(countdown_text(time));
        self.view.display = Some(MatchDisplay::Countdown);
    }

    /// Apply a looked-up profile to a slot.
    ///
    /// The latest response wins, even if the slot has since been given to
    /// a different player.
    pub fn apply_profile(&mut self, slot: Slot, user: UserId, profile: &UserProfile) {
        let target = self.view.slot_mut(slot);
        if target.user != Some(user) {
            debug!(?slot, user, current = ?target.user, "Applying profile to a reassigned slot");
        }
        target.name = profile.display_name();
        target.avatar = Some(profile.avatar_url());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::{EnrichTarget, DEFAULT_AVATAR};
    use arena_protocol::{Player, ScoreEntry};

    fn next_match(p1: UserId, p2: UserId) -> MatchData {
        MatchData {
            player1: Player::new(p1, "one"),
            player2: Player::new(p2, "two"),
            winner: None,
            round: 1,
        }
    }

    fn score(a: u32, b: u32) -> ScoreUpdate {
        ScoreUpdate {
            player1: ScoreEntry { score: a },
            player2: ScoreEntry { score: b },
        }
    }

    fn assert_exclusive(view: &MatchView) {
        assert_ne!(view.score_visible(), view.countdown_visible());
    }

    #[test]
    fn test_countdown_text() {
        assert_eq!(countdown_text(3), "3");
        assert_eq!(countdown_text(0), "Go!");
        assert_eq!(countdown_text(-2), "Go!");
    }

    #[test]
    fn test_countdown_then_go_never_shows_score() {
        let mut coordinator = MatchCoordinator::new();
        coordinator.on_next_match(&next_match(1, 2));

        coordinator.on_countdown(3);
        assert_eq!(coordinator.view().countdown.as_deref(), Some("3"));
        assert!(coordinator.view().countdown_visible());
        assert!(!coordinator.view().score_visible());

        coordinator.on_countdown(0);
        assert_eq!(coordinator.view().countdown.as_deref(), Some("Go!"));
        assert!(!coordinator.view().score_visible());
    }

    #[test]
    fn test_displays_are_mutually_exclusive() {
        let mut coordinator = MatchCoordinator::new();
        assert!(coordinator.view().display.is_none());

        coordinator.on_next_match(&next_match(1, 2));
        assert_exclusive(coordinator.view());
        coordinator.on_countdown(2);
        assert_exclusive(coordinator.view());
        coordinator.on_score_update(&score(1, 0));
        assert_exclusive(coordinator.view());
        assert_eq!(coordinator.view().score, "1 - 0");
        coordinator.on_next_match(&next_match(3, 4));
        assert_exclusive(coordinator.view());
        coordinator.on_countdown(1);
        assert_exclusive(coordinator.view());
    }

    #[test]
    fn test_next_match_sets_ids_before_names() {
        let mut coordinator = MatchCoordinator::new();
        let requests = coordinator.on_next_match(&next_match(1, 2));
        assert_eq!(requests[0].user, 1);
        assert_eq!(requests[0].target, EnrichTarget::MatchSlot(Slot::Player1));
        assert_eq!(requests[1].target, EnrichTarget::MatchSlot(Slot::Player2));

        let alice = UserProfile {
            username: "alice".into(),
            ..Default::default()
        };
        coordinator.apply_profile(Slot::Player1, 1, &alice);

        coordinator.on_next_match(&next_match(5, 6));
        let view = coordinator.view();
        assert_eq!(view.player1.user, Some(5));
        assert_eq!(view.player2.user, Some(6));
        // Name lags until the new lookup resolves
        assert_eq!(view.player1.name, "alice");
        assert_eq!(view.score, "0 - 0");
    }

    #[test]
    fn test_last_resolved_profile_wins() {
        let mut coordinator = MatchCoordinator::new();
        coordinator.on_next_match(&next_match(1, 2));
        coordinator.on_next_match(&next_match(3, 2));

        let newer = UserProfile {
            username: "carol".into(),
            avatar: Some("c.png".into()),
            updated_at: None,
        };
        let older = UserProfile {
            username: "alice".into(),
            ..Default::default()
        };
        coordinator.apply_profile(Slot::Player1, 3, &newer);
        coordinator.apply_profile(Slot::Player1, 1, &older);

        let slot = coordinator.view().slot(Slot::Player1);
        assert_eq!(slot.name, "alice");
        assert_eq!(slot.avatar.as_deref(), Some(DEFAULT_AVATAR));
        assert_eq!(slot.user, Some(3));
    }
}
