//! Last known snapshot of every tournament.

use arena_protocol::{Tournament, TournamentId};
use tracing::debug;

/// Holds the latest `tournaments` snapshot.
///
/// There is no partial update: the only way to change the content is to
/// replace all of it.
#[derive(Debug, Default, Clone)]
pub struct TournamentDirectory {
    tournaments: Vec<Tournament>,
}

impl TournamentDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole content with a new snapshot.
    pub fn replace(&mut self, snapshot: Vec<Tournament>) {
        debug!(
            previous = self.tournaments.len(),
            current = snapshot.len(),
            "Replacing tournament snapshot"
        );
        self.tournaments = snapshot;
    }

    /// Drop every tournament.
    pub fn clear(&mut self) {
        self.tournaments.clear();
    }

    /// Find a tournament by id in the current snapshot.
    #[must_use]
    pub fn find(&self, id: TournamentId) -> Option<&Tournament> {
        self.tournaments.iter().find(|t| t.id == id)
    }

    /// Tournaments in server order.
    #[must_use]
    pub fn tournaments(&self) -> &[Tournament] {
        &self.tournaments
    }

    /// Iterate over tournaments in server order.
    pub fn iter(&self) -> impl Iterator<Item = &Tournament> {
        self.tournaments.iter()
    }

    /// Number of tournaments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tournaments.len()
    }

    /// Whether the snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tournaments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_protocol::Player;

    fn tournament(id: TournamentId, name: &str) -> Tournament {
        Tournament {
            id,
            name: name.into(),
            creator: Player::new(1, "creator"),
            players: vec![],
            started: false,
        }
    }

    #[test]
    fn test_replace_leaves_no_residue() {
        let mut dir = TournamentDirectory::new();
        dir.replace(vec![tournament(1, "a"), tournament(2, "b")]);
        assert_eq!(dir.len(), 2);

        let next = vec![tournament(3, "c")];
        dir.replace(next.clone());
        assert_eq!(dir.tournaments(), next.as_slice());
        assert!(dir.find(1).is_none());
        assert!(dir.find(2).is_none());
    }

    #[test]
    fn test_find() {
        let mut dir = TournamentDirectory::new();
        assert!(dir.find(1).is_none());

        dir.replace(vec![tournament(1, "a"), tournament(2, "b")]);
        assert_eq!(dir.find(2).map(|t| t.name.as_str()), Some("b"));
        assert!(dir.find(7).is_none());
    }

    #[test]
    fn test_clear() {
        let mut dir = TournamentDirectory::new();
        dir.replace(vec![tournament(1, "a")]);
        dir.clear();
        assert!(dir.is_empty());
    }
}
