//! Local user identity.
//!
//! The identity is loaded once at startup and never changes for the
//! lifetime of a session.

use arena_protocol::{Tournament, UserId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Identity loading errors.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The identity file could not be read.
    #[error("Failed to read identity file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The identity file is not valid JSON user info.
    #[error("Invalid identity: {0}")]
    Parse(#[from] serde_json::Error),

    /// The identity has no token.
    #[error("Identity has no token")]
    MissingToken,
}

/// The logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Account id.
    pub id: UserId,
    /// Bearer token for the game socket and the user directory.
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl UserInfo {
    /// Create an identity from an id and a token.
    #[must_use]
    pub fn new(id: UserId, token: impl Into<String>) -> Self {
        Self {
            id,
            token: token.into(),
            username: None,
            avatar: None,
            updated_at: None,
        }
    }

    /// Parse an identity from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or the token is empty.
    pub fn from_json(json: &str) -> Result<Self, IdentityError> {
        let info: UserInfo = serde_json::from_str(json)?;
        if !info.has_token() {
            return Err(IdentityError::MissingToken);
        }
        Ok(info)
    }

    /// Load an identity from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IdentityError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| IdentityError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Whether a non-empty token is present.
    #[must_use]
    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }
}

/// How a user relates to a tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Created the tournament (whether or not subscribed).
    Creator,
    /// Subscribed, but not the creator.
    Participant,
    /// Neither.
    Observer,
}

impl Role {
    /// Derive the role of `user` in `tournament`.
    #[must_use]
    pub fn of(user: UserId, tournament: &Tournament) -> Self {
        if tournament.is_created_by(user) {
            Role::Creator
        } else if tournament.has_player(user) {
            Role::Participant
        } else {
            Role::Observer
        }
    }

    /// Short label for views; observers have none.
    #[must_use]
    pub fn label(self) -> Option<&'static str> {
        match self {
            Role::Creator => Some("creator"),
            Role::Participant => Some("player"),
            Role::Observer => None,
        }
    }
}
