//! # arena-core
//!
//! Client-side state machine for Arena tournaments.
//!
//! This crate keeps a local view of the tournaments on the game server in
//! step with the server's pushes, and turns user intents into commands:
//!
//! - **Connection** - The single game connection and its close codes
//! - **Router** - Dispatches decoded server messages
//! - **Directory** - The latest tournament snapshot
//! - **Session** - The tournament open in the detail view
//! - **Match** - Live match header (players, score, countdown)
//! - **Dispatcher** - Guarded outbound commands
//! - **Enrichment** - Display names and avatars from the user directory
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ FrameStream │────▶│   Router    │────▶│  Directory  │──▶ Session
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                        │       │
//!                        ▼       ▼
//!                 ┌──────────┐ ┌─────────────┐
//!                 │   Game   │ │    Match    │
//!                 └──────────┘ └─────────────┘
//!
//! Intent ──▶ Dispatcher ──▶ Connection ──▶ server
//! ```
//!
//! Server snapshots always replace local state; commands never change it
//! directly.

pub mod client;
pub mod connection;
pub mod directory;
pub mod dispatcher;
pub mod enrichment;
pub mod identity;
pub mod match_view;
pub mod presenter;
pub mod router;
pub mod session;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use client::{ArenaClient, Collaborators, InboundOutcome};
pub use connection::{ConnectionManager, ConnectionState, Endpoint};
pub use directory::TournamentDirectory;
pub use dispatcher::{CommandDispatcher, DispatchError, Intent};
pub use enrichment::{
    avatar_url, EnrichTarget, Enricher, Enrichment, EnrichmentError, EnrichmentRequest,
    ProfileCache, UserDirectory, UserProfile, DEFAULT_AVATAR,
};
pub use identity::{IdentityError, Role, UserInfo};
pub use match_view::{MatchCoordinator, MatchDisplay, MatchView, PlayerSlot, Slot};
pub use presenter::{AuthSession, DetailView, GameEngine, Presenter, TournamentCard};
pub use router::{MessageRouter, Routed, RouterStats, Targets};
pub use session::{TournamentSession, TournamentView, MIN_PLAYERS_TO_START};
