//! Display-name and avatar lookups against the user directory.
//!
//! Lookups run as spawned tasks and report back over a channel, so the
//! results are applied from the same loop that handles inbound frames.
//! Nothing is cancelled or sequenced: whichever response arrives last is
//! what gets displayed.

use arena_protocol::{Player, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::match_view::Slot;

/// Avatar shown when a user has none.
pub const DEFAULT_AVATAR: &str = "/assets/default-avatar.png";

/// User directory errors.
#[derive(Debug, Clone, Error)]
pub enum EnrichmentError {
    /// The request could not be sent or the connection failed.
    #[error("Request failed: {0}")]
    Request(String),

    /// The directory answered with a non-success status.
    #[error("Unexpected status {0}")]
    Status(u16),

    /// The body is not a user profile.
    #[error("Invalid profile: {0}")]
    Decode(String),
}

/// Public profile of a user, as returned by `GET /user/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl UserProfile {
    /// Username with surrounding whitespace removed.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.username.trim().to_string()
    }

    /// URL of the avatar image.
    #[must_use]
    pub fn avatar_url(&self) -> String {
        avatar_url(self.avatar.as_deref(), self.updated_at.as_deref())
    }
}

/// Build an avatar URL.
///
/// Absolute URLs are kept, bare file names are served from `/uploads/`,
/// and `version` is appended as a cache buster.
#[must_use]
pub fn avatar_url(avatar: Option<&str>, version: Option<&str>) -> String {
    let Some(avatar) = avatar.filter(|a| !a.is_empty()) else {
        return DEFAULT_AVATAR.to_string();
    };

    let base = if avatar.starts_with("http") {
        avatar.to_string()
    } else {
        format!("/uploads/{}", avatar)
    };

    match version.filter(|v| !v.is_empty()) {
        Some(v) => format!("{}?v={}", base, v),
        None => base,
    }
}

/// Source of user profiles.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch the profile of a user.
    async fn fetch(&self, user: UserId) -> Result<UserProfile, EnrichmentError>;
}

/// Where a looked-up profile is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichTarget {
    /// Tournament list and detail view (creators and players).
    Directory,
    /// One side of the live match header.
    MatchSlot(Slot),
}

/// A profile lookup to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichmentRequest {
    pub user: UserId,
    pub target: EnrichTarget,
}

impl EnrichmentRequest {
    /// Lookup for the list and detail views.
    #[must_use]
    pub fn directory(user: UserId) -> Self {
        Self {
            user,
            target: EnrichTarget::Directory,
        }
    }

    /// Lookup for a match slot.
    #[must_use]
    pub fn match_slot(user: UserId, slot: Slot) -> Self {
        Self {
            user,
            target: EnrichTarget::MatchSlot(slot),
        }
    }
}

/// A finished lookup.
#[derive(Debug, Clone)]
pub struct Enrichment {
    pub request: EnrichmentRequest,
    pub outcome: Result<UserProfile, EnrichmentError>,
}

/// Spawns lookups and sends their results back to the event loop.
#[derive(Clone)]
pub struct Enricher {
    users: Arc<dyn UserDirectory>,
    results: mpsc::UnboundedSender<Enrichment>,
}

impl Enricher {
    /// Create an enricher and the receiver its results arrive on.
    #[must_use]
    pub fn new(users: Arc<dyn UserDirectory>) -> (Self, mpsc::UnboundedReceiver<Enrichment>) {
        let (results, rx) = mpsc::unbounded_channel();
        (Self { users, results }, rx)
    }

    /// Start a lookup in the background.
    ///
    /// Returns `false` without doing anything when called outside a tokio
    /// runtime.
    pub fn spawn(&self, request: EnrichmentRequest) -> bool {
        let Ok(runtime) = Handle::try_current() else {
            debug!(user = request.user, "No runtime, skipping profile lookup");
            return false;
        };

        let users = Arc::clone(&self.users);
        let results = self.results.clone();
        trace!(user = request.user, target = ?request.target, "Spawning profile lookup");

        runtime.spawn(async move {
            let outcome = users.fetch(request.user).await;
            if results.send(Enrichment { request, outcome }).is_err() {
                debug!(user = request.user, "Profile lookup finished after shutdown");
            }
        });
        true
    }
}

/// Profiles resolved so far, keyed by user id.
///
/// Every render looks its users up again; entries are only written by
/// successful lookups, so a failed lookup keeps whatever was displayed
/// before.
#[derive(Debug, Default)]
pub struct ProfileCache {
    profiles: HashMap<UserId, UserProfile>,
    pending: HashSet<UserId>,
}

impl ProfileCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a user as being looked up.
    ///
    /// Returns `false` if a lookup for the user is already in flight.
    /// Cached users are looked up again so renames show up.
    pub fn begin(&mut self, user: UserId) -> bool {
        self.pending.insert(user)
    }

    /// Forget a lookup that was never started.
    pub fn abandon(&mut self, user: UserId) {
        self.pending.remove(&user);
    }

    /// Record the outcome of a lookup.
    ///
    /// Returns `true` if the cache changed.
    pub fn complete(
        &mut self,
        user: UserId,
        outcome: &Result<UserProfile, EnrichmentError>,
    ) -> bool {
        self.pending.remove(&user);
        match outcome {
            Ok(profile) => self.insert(user, profile.clone()),
            Err(e) => {
                debug!(user, error = %e, "Profile lookup failed, keeping previous name");
                false
            }
        }
    }

    /// Store a profile. Returns `true` if it differs from the cached one.
    pub fn insert(&mut self, user: UserId, profile: UserProfile) -> bool {
        self.profiles.insert(user, profile.clone()) != Some(profile)
    }

    /// Cached profile of a user.
    #[must_use]
    pub fn get(&self, user: UserId) -> Option<&UserProfile> {
        self.profiles.get(&user)
    }

    /// Name to show for a player: the looked-up one if known, otherwise the
    /// username from the snapshot.
    #[must_use]
    pub fn display_name(&self, player: &Player) -> String {
        self.profiles
            .get(&player.id)
            .map(UserProfile::display_name)
            .unwrap_or_else(|| player.username.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedDirectory;

    #[async_trait]
    impl UserDirectory for FixedDirectory {
        async fn fetch(&self, user: UserId) -> Result<UserProfile, EnrichmentError> {
            if user == 404 {
                return Err(EnrichmentError::Status(404));
            }
            Ok(UserProfile {
                username: format!("  user{}  ", user),
                avatar: None,
                updated_at: None,
            })
        }
    }

    #[test]
    fn test_avatar_url_rules() {
        assert_eq!(avatar_url(None, None), DEFAULT_AVATAR);
        assert_eq!(avatar_url(Some(""), Some("1")), DEFAULT_AVATAR);
        assert_eq!(avatar_url(Some("a.png"), None), "/uploads/a.png");
        assert_eq!(
            avatar_url(Some("a.png"), Some("2024-01-01")),
            "/uploads/a.png?v=2024-01-01"
        );
        assert_eq!(
            avatar_url(Some("https://cdn.example/a.png"), None),
            "https://cdn.example/a.png"
        );
    }

    #[test]
    fn test_display_name_is_trimmed() {
        let profile = UserProfile {
            username: " nina \n".into(),
            ..Default::default()
        };
        assert_eq!(profile.display_name(), "nina");
    }

    #[test]
    fn test_cache_keeps_previous_on_failure() {
        let mut cache = ProfileCache::new();
        let player = Player::new(9, "snapshot-name");
        assert_eq!(cache.display_name(&player), "snapshot-name");

        assert!(cache.begin(9));
        assert!(!cache.begin(9));
        let ok = Ok(UserProfile {
            username: "nina".into(),
            ..Default::default()
        });
        assert!(cache.complete(9, &ok));
        assert_eq!(cache.display_name(&player), "nina");

        // Cached users are looked up again
        assert!(cache.begin(9));
        assert!(!cache.complete(9, &Err(EnrichmentError::Status(500))));
        assert_eq!(cache.display_name(&player), "nina");
    }

    #[test]
    fn test_later_success_replaces_cached_profile() {
        let mut cache = ProfileCache::new();
        let player = Player::new(9, "snapshot-name");
        let named = |name: &str| {
            Ok(UserProfile {
                username: name.to_string(),
                ..Default::default()
            })
        };

        cache.begin(9);
        assert!(cache.complete(9, &named("nina")));
        cache.begin(9);
        assert!(!cache.complete(9, &named("nina")));
        cache.begin(9);
        assert!(cache.complete(9, &named("nina r")));
        assert_eq!(cache.display_name(&player), "nina r");
    }

    #[test]
    fn test_abandoned_lookup_can_be_retried() {
        let mut cache = ProfileCache::new();
        assert!(cache.begin(4));
        cache.abandon(4);
        assert!(cache.begin(4));
    }

    #[test]
    fn test_spawn_outside_runtime_is_skipped() {
        let (enricher, mut rx) = Enricher::new(Arc::new(FixedDirectory));
        assert!(!enricher.spawn(EnrichmentRequest::directory(7)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_failed_lookup_can_be_retried() {
        let mut cache = ProfileCache::new();
        assert!(cache.begin(3));
        cache.complete(3, &Err(EnrichmentError::Request("timeout".into())));
        assert!(cache.begin(3));
    }

    #[tokio::test]
    async fn test_enricher_reports_results() {
        let (enricher, mut rx) = Enricher::new(Arc::new(FixedDirectory));
        assert!(enricher.spawn(EnrichmentRequest::match_slot(7, Slot::Player1)));
        assert!(enricher.spawn(EnrichmentRequest::directory(404)));

        let mut seen = Vec::new();
        for _ in 0..2 {
            seen.push(rx.recv().await.unwrap());
        }
        seen.sort_by_key(|e| e.request.user);

        assert_eq!(seen[0].request.target, EnrichTarget::MatchSlot(Slot::Player1));
        assert_eq!(seen[0].outcome.as_ref().unwrap().display_name(), "user7");
        assert!(matches!(seen[1].outcome, Err(EnrichmentError::Status(404))));
    }
}
