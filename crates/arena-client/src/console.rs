//! Text front end: renders views to stdout and stands in for the game
//! engine and the login session.

use arena_core::{
    AuthSession, ConnectionState, DetailView, GameEngine, MatchView, Presenter, Role,
    TournamentCard, TournamentView,
};
use arena_transport::TransportHandle;
use std::fmt::Write as _;
use tracing::{debug, info, trace, warn};

/// Prints tournament views.
#[derive(Debug, Default)]
pub struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn tournaments(&mut self, cards: &[TournamentCard]) {
        debug!(count = cards.len(), "Rendering tournament list");
        println!("{}", render_list(cards));
    }

    fn detail(&mut self, view: &DetailView) {
        debug!(tournament = ?view.tournament, "Rendering tournament detail");
        println!("{}", render_detail(view));
    }

    fn detail_closed(&mut self) {
        debug!("Closed tournament detail");
    }

    fn match_header(&mut self, view: &MatchView) {
        println!("{}", render_match(view));
    }

    fn connection(&mut self, state: ConnectionState) {
        match state {
            ConnectionState::Connected => println!("* connected"),
            ConnectionState::Disconnected => println!("* disconnected"),
        }
    }
}

/// Logs game frames; the engine itself lives elsewhere.
#[derive(Default)]
pub struct ConsoleGame {
    transport: Option<TransportHandle>,
}

impl GameEngine for ConsoleGame {
    fn receive(&mut self, payload: &serde_json::Value) {
        let open = self.transport.as_ref().is_some_and(|t| t.is_open());
        trace!(open, %payload, "Game frame");
    }

    fn transport_changed(&mut self, handle: TransportHandle) {
        debug!(connection = %handle.id(), "Game engine attached to connection");
        self.transport = Some(handle);
    }
}

/// Reports a rejected login. The client loop stops afterwards.
#[derive(Debug, Default)]
pub struct ConsoleAuth;

impl AuthSession for ConsoleAuth {
    fn logout(&mut self) {
        warn!("Game server rejected the session token, logging out");
        info!("Log in again and update the identity file to continue");
    }
}

fn actions(flags: &TournamentView) -> String {
    let mut out = Vec::new();
    if flags.can_subscribe {
        out.push("join");
    }
    if flags.can_unsubscribe {
        out.push("leave");
    }
    if flags.can_start {
        out.push("start");
    }
    if flags.can_delete {
        out.push("delete");
    }
    out.join(" ")
}

/// Render the tournament list.
#[must_use]
pub fn render_list(cards: &[TournamentCard]) -> String {
    if cards.is_empty() {
        return "No tournaments".to_string();
    }

    let mut out = String::from("Tournaments:");
    for card in cards {
        let _ = write!(
            out,
            "\n  #{} {} by {} ({})",
            card.id,
            card.name,
            card.creator,
            card.players_label()
        );
        if card.actions.subscribed {
            out.push_str(" *");
        }
        if let Some(role) = card.role.label() {
            let _ = write!(out, " <{}>", role);
        }
        if card.started {
            out.push_str(" [started]");
        }
        let actions = actions(&card.actions);
        if !actions.is_empty() {
            let _ = write!(out, " [{}]", actions);
        }
    }
    out
}

/// Render the detail view.
#[must_use]
pub fn render_detail(view: &DetailView) -> String {
    let mut out = format!("{}\n  {}", view.title, view.status);
    if let Some(role) = view.role.and_then(Role::label) {
        let _ = write!(out, "\n  you: {}", role);
    }
    for player in &view.players {
        let _ = write!(out, "\n  - {}", player);
    }
    let actions = actions(&view.actions);
    if !actions.is_empty() {
        let _ = write!(out, "\n  actions: {}", actions);
    }
    out
}

/// Render the match header.
#[must_use]
pub fn render_match(view: &MatchView) -> String {
    let name = |slot: &arena_core::PlayerSlot| match (&slot.user, slot.name.is_empty()) {
        (Some(id), true) => format!("#{}", id),
        _ => slot.name.clone(),
    };

    let centre = if view.countdown_visible() {
        view.countdown.clone().unwrap_or_default()
    } else {
        view.score.clone()
    };

    format!(
        "Round {}: {}  {}  {}",
        view.round,
        name(&view.player1),
        centre,
        name(&view.player2)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{MatchDisplay, PlayerSlot};

    fn card(player_count: usize, role: Role, actions: TournamentView) -> TournamentCard {
        TournamentCard {
            id: 1,
            name: "Cup".into(),
            creator: "nina".into(),
            player_count,
            started: false,
            role,
            actions,
        }
    }

    #[test]
    fn test_render_list() {
        assert_eq!(render_list(&[]), "No tournaments");

        let flags = TournamentView {
            subscribed: true,
            is_creator: true,
            can_unsubscribe: true,
            can_delete: true,
            ..Default::default()
        };
        assert_eq!(
            render_list(&[card(1, Role::Creator, flags)]),
            "Tournaments:\n  #1 Cup by nina (1 player) * <creator> [leave delete]"
        );

        let open = TournamentView {
            can_subscribe: true,
            ..Default::default()
        };
        assert_eq!(
            render_list(&[card(2, Role::Observer, open)]),
            "Tournaments:\n  #1 Cup by nina (2 players) [join]"
        );
    }

    #[test]
    fn test_render_detail_shows_role() {
        let view = DetailView {
            tournament: Some(1),
            title: "Players in \"Cup\"".into(),
            status: "Creator: nina".into(),
            players: vec!["nina".into(), "omar".into()],
            role: Some(Role::Participant),
            actions: TournamentView {
                subscribed: true,
                can_unsubscribe: true,
                ..Default::default()
            },
        };
        assert_eq!(
            render_detail(&view),
            "Players in \"Cup\"\n  Creator: nina\n  you: player\n  - nina\n  - omar\n  \
             actions: leave"
        );

        let none = DetailView {
            tournament: None,
            title: "Select a tournament".into(),
            status: "No tournament".into(),
            players: Vec::new(),
            role: None,
            actions: TournamentView::default(),
        };
        assert_eq!(render_detail(&none), "Select a tournament\n  No tournament");
    }

    #[test]
    fn test_render_match_shows_one_display() {
        let mut view = MatchView {
            player1: PlayerSlot {
                user: Some(1),
                name: "alice".into(),
                avatar: None,
            },
            player2: PlayerSlot {
                user: Some(2),
                ..Default::default()
            },
            round: 2,
            score: "3 - 1".into(),
            countdown: Some("Go!".into()),
            display: Some(MatchDisplay::Countdown),
        };
        assert_eq!(render_match(&view), "Round 2: alice  Go!  #2");

        view.display = Some(MatchDisplay::Score);
        assert_eq!(render_match(&view), "Round 2: alice  3 - 1  #2");
    }
}
