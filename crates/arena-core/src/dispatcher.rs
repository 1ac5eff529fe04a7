//! Translates user intents into outbound messages.
//!
//! The guards here only decide whether an action is offered to the user.
//! The server is expected to validate every command again. Nothing in
//! this module touches local state: visible effects arrive with the next
//! `tournaments` snapshot.

use arena_protocol::{ClientMessage, TournamentId, UserId};
use arena_transport::TransportError;
use thiserror::Error;

use crate::directory::TournamentDirectory;
use crate::session::TournamentView;

/// Something the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    ListTournaments,
    CreateTournament(String),
    Subscribe(TournamentId),
    Unsubscribe(TournamentId),
    Start(TournamentId),
    Delete(TournamentId),
}

impl Intent {
    /// Short label used in logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::ListTournaments => "list",
            Intent::CreateTournament(_) => "create",
            Intent::Subscribe(_) => "subscribe",
            Intent::Unsubscribe(_) => "unsubscribe",
            Intent::Start(_) => "start",
            Intent::Delete(_) => "delete",
        }
    }
}

/// Dispatch errors.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Tournament name is blank.
    #[error("Tournament name is empty")]
    EmptyName,

    /// The tournament is not in the current snapshot.
    #[error("Unknown tournament {0}")]
    UnknownTournament(TournamentId),

    /// The action is not available for this tournament.
    #[error("Cannot {action} tournament {tournament}")]
    Guard {
        action: &'static str,
        tournament: TournamentId,
    },

    /// There is no open connection.
    #[error("Not connected to the game server")]
    NotConnected,

    /// Sending failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Builds outbound messages from intents.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandDispatcher;

impl CommandDispatcher {
    /// Create a dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build the message for an intent, if its guard holds.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, the tournament is unknown,
    /// or the action is not currently available to `user`.
    pub fn translate(
        &self,
        intent: &Intent,
        directory: &TournamentDirectory,
        user: UserId,
    ) -> Result<ClientMessage, DispatchError> {
        match intent {
            Intent::ListTournaments => Ok(ClientMessage::ListTournaments),
            Intent::CreateTournament(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(DispatchError::EmptyName);
                }
                Ok(ClientMessage::create(name))
            }
            Intent::Subscribe(id) => {
                guarded(directory, *id, user, "subscribe", |v| v.can_subscribe)?;
                Ok(ClientMessage::Subscribe { tournament: *id })
            }
            Intent::Unsubscribe(id) => {
                guarded(directory, *id, user, "unsubscribe", |v| v.can_unsubscribe)?;
                Ok(ClientMessage::Unsubscribe { tournament: *id })
            }
            Intent::Start(id) => {
                guarded(directory, *id, user, "start", |v| v.can_start)?;
                Ok(ClientMessage::StartTournament { tournament: *id })
            }
            Intent::Delete(id) => {
                guarded(directory, *id, user, "delete", |v| v.can_delete)?;
                Ok(ClientMessage::DeleteTournament { tournament: *id })
            }
        }
    }
}

fn guarded(
    directory: &TournamentDirectory,
    id: TournamentId,
    user: UserId,
    action: &'static str,
    allowed: impl Fn(&TournamentView) -> bool,
) -> Result<(), DispatchError> {
    let tournament = directory
        .find(id)
        .ok_or(DispatchError::UnknownTournament(id))?;

    if allowed(&TournamentView::derive(Some(tournament), user)) {
        Ok(())
    } else {
        Err(DispatchError::Guard {
            action,
            tournament: id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_protocol::{Player, Tournament};

    fn directory(players: Vec<Player>, started: bool) -> TournamentDirectory {
        let mut dir = TournamentDirectory::new();
        dir.replace(vec![Tournament {
            id: 1,
            name: "Cup".into(),
            creator: Player::new(9, "nina"),
            players,
            started,
        }]);
        dir
    }

    #[test]
    fn test_start_requires_two_players() {
        let dispatcher = CommandDispatcher::new();
        let alone = directory(vec![Player::new(9, "nina")], false);
        assert!(matches!(
            dispatcher.translate(&Intent::Start(1), &alone, 9),
            Err(DispatchError::Guard { action: "start", tournament: 1 })
        ));

        let pair = directory(vec![Player::new(9, "nina"), Player::new(4, "omar")], false);
        assert_eq!(
            dispatcher.translate(&Intent::Start(1), &pair, 9).unwrap(),
            ClientMessage::StartTournament { tournament: 1 }
        );
        // Only the creator may start
        assert!(dispatcher.translate(&Intent::Start(1), &pair, 4).is_err());
    }

    #[test]
    fn test_started_tournament_rejects_everything() {
        let dispatcher = CommandDispatcher::new();
        let dir = directory(vec![Player::new(9, "nina"), Player::new(4, "omar")], true);
        for intent in [
            Intent::Subscribe(1),
            Intent::Unsubscribe(1),
            Intent::Start(1),
            Intent::Delete(1),
        ] {
            assert!(dispatcher.translate(&intent, &dir, 9).is_err());
            assert!(dispatcher.translate(&intent, &dir, 4).is_err());
        }
    }

    #[test]
    fn test_membership_guards() {
        let dispatcher = CommandDispatcher::new();
        let dir = directory(vec![Player::new(9, "nina")], false);

        assert!(dispatcher.translate(&Intent::Subscribe(1), &dir, 9).is_err());
        assert_eq!(
            dispatcher.translate(&Intent::Unsubscribe(1), &dir, 9).unwrap(),
            ClientMessage::Unsubscribe { tournament: 1 }
        );
        assert_eq!(
            dispatcher.translate(&Intent::Subscribe(1), &dir, 5).unwrap(),
            ClientMessage::Subscribe { tournament: 1 }
        );
        assert!(dispatcher.translate(&Intent::Unsubscribe(1), &dir, 5).is_err());
        assert!(dispatcher.translate(&Intent::Delete(1), &dir, 5).is_err());
        assert_eq!(
            dispatcher.translate(&Intent::Delete(1), &dir, 9).unwrap(),
            ClientMessage::DeleteTournament { tournament: 1 }
        );
    }

    #[test]
    fn test_unknown_tournament() {
        let dispatcher = CommandDispatcher::new();
        let dir = TournamentDirectory::new();
        assert!(matches!(
            dispatcher.translate(&Intent::Subscribe(3), &dir, 9),
            Err(DispatchError::UnknownTournament(3))
        ));
    }

    #[test]
    fn test_create_and_list_are_unguarded_but_name_is_trimmed() {
        let dispatcher = CommandDispatcher::new();
        let dir = TournamentDirectory::new();
        assert_eq!(
            dispatcher
                .translate(&Intent::CreateTournament("  X ".into()), &dir, 9)
                .unwrap(),
            ClientMessage::create("X")
        );
        assert!(matches!(
            dispatcher.translate(&Intent::CreateTournament("   ".into()), &dir, 9),
            Err(DispatchError::EmptyName)
        ));
        assert_eq!(
            dispatcher.translate(&Intent::ListTournaments, &dir, 9).unwrap(),
            ClientMessage::ListTournaments
        );
    }
}
