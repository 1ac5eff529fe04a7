//! The client session context.
//!
//! [`ArenaClient`] owns every piece of client state and is driven by one
//! event loop: inbound frames, user intents and finished profile lookups
//! are each handled to completion before the next one is looked at.

use arena_protocol::{ClientMessage, CloseReason, TournamentId, UserId};
use arena_transport::{FrameStream, Inbound, TransportError};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::connection::{ConnectionManager, ConnectionState};
use crate::directory::TournamentDirectory;
use crate::dispatcher::{CommandDispatcher, DispatchError, Intent};
use crate::enrichment::{
    EnrichTarget, Enricher, Enrichment, EnrichmentRequest, ProfileCache, UserDirectory,
};
use crate::identity::UserInfo;
use crate::match_view::MatchCoordinator;
use crate::presenter::{AuthSession, DetailView, GameEngine, Presenter, TournamentCard};
use crate::router::{MessageRouter, Routed, Targets};
use crate::session::TournamentSession;

/// External collaborators the client calls into.
pub struct Collaborators {
    pub presenter: Box<dyn Presenter>,
    pub game: Box<dyn GameEngine>,
    pub auth: Box<dyn AuthSession>,
    pub users: Arc<dyn UserDirectory>,
}

/// What handling one inbound event amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundOutcome {
    /// A frame was routed.
    Routed(Routed),
    /// The server closed the connection.
    Closed(CloseReason),
    /// The connection failed and was torn down.
    Failed,
}

/// Tournament client for one logged-in user.
pub struct ArenaClient {
    identity: UserInfo,
    connection: ConnectionManager,
    router: MessageRouter,
    dispatcher: CommandDispatcher,
    directory: TournamentDirectory,
    session: TournamentSession,
    matches: MatchCoordinator,
    profiles: ProfileCache,
    enricher: Enricher,
    presenter: Box<dyn Presenter>,
    game: Box<dyn GameEngine>,
    auth: Box<dyn AuthSession>,
    logged_out: bool,
}

impl ArenaClient {
    /// Create a disconnected client.
    ///
    /// Finished profile lookups arrive on the returned receiver and must be
    /// handed back through [`ArenaClient::on_enrichment`].
    #[must_use]
    pub fn new(
        identity: UserInfo,
        connection: ConnectionManager,
        collaborators: Collaborators,
    ) -> (Self, mpsc::UnboundedReceiver<Enrichment>) {
        let (enricher, enrichments) = Enricher::new(collaborators.users);
        let client = Self {
            identity,
            connection,
            router: MessageRouter::new(),
            dispatcher: CommandDispatcher::new(),
            directory: TournamentDirectory::new(),
            session: TournamentSession::new(),
            matches: MatchCoordinator::new(),
            profiles: ProfileCache::new(),
            enricher,
            presenter: collaborators.presenter,
            game: collaborators.game,
            auth: collaborators.auth,
            logged_out: false,
        };
        (client, enrichments)
    }

    /// Open the game connection.
    ///
    /// Returns the stream to read inbound frames from, or `None` if no new
    /// connection was opened.
    pub async fn connect(&mut self) -> Option<Box<dyn FrameStream>> {
        if self.logged_out {
            warn!("Logged out, not connecting to the game server");
            return None;
        }

        let connected = self.connection.connect(&self.identity).await?;
        self.game.transport_changed(Arc::clone(&connected.connection));
        self.presenter.connection(ConnectionState::Connected);
        Some(connected.stream)
    }

    /// Close the connection and clear everything it delivered.
    ///
    /// Does nothing when there is no connection.
    pub async fn disconnect(&mut self) {
        if self.connection.disconnect().await {
            self.teardown();
        }
    }

    /// Handle one event read from the frame stream.
    ///
    /// After [`InboundOutcome::Closed`] or [`InboundOutcome::Failed`] the
    /// stream must be dropped.
    pub async fn on_inbound(&mut self, inbound: Result<Inbound, TransportError>) -> InboundOutcome {
        match inbound {
            Ok(Inbound::Text(text)) => InboundOutcome::Routed(self.on_text(&text)),
            Ok(Inbound::Closed { code }) => InboundOutcome::Closed(self.on_close(code).await),
            Err(e) => {
                warn!(error = %e, "Game connection failed");
                self.disconnect().await;
                InboundOutcome::Failed
            }
        }
    }

    /// Route one text frame and re-render what it changed.
    pub fn on_text(&mut self, text: &str) -> Routed {
        let routed = self.router.route_text(
            text,
            Targets {
                directory: &mut self.directory,
                session: &mut self.session,
                matches: &mut self.matches,
                game: self.game.as_mut(),
            },
        );

        match &routed {
            Routed::Snapshot(_) => {
                self.render_list();
                self.render_detail();
                self.enrich_directory();
            }
            Routed::NextMatch(requests) => {
                for request in requests {
                    self.enricher.spawn(*request);
                }
                self.presenter.match_header(self.matches.view());
            }
            Routed::Score | Routed::Countdown => self.presenter.match_header(self.matches.view()),
            Routed::Game | Routed::Ignored(_) | Routed::Dropped => {}
        }

        routed
    }

    /// The server closed the connection.
    ///
    /// The last snapshot stays on screen. Token failures log the user out.
    pub async fn on_close(&mut self, code: Option<u16>) -> CloseReason {
        let reason = CloseReason::from_code(code);
        info!(code = ?code, reason = reason.as_str(), "{}", reason);

        if self.connection.disconnect().await {
            self.presenter.connection(ConnectionState::Disconnected);
        }

        if reason.is_auth_failure() && !self.logged_out {
            self.logged_out = true;
            self.auth.logout();
        }
        reason
    }

    /// Send the command for an intent.
    ///
    /// Local state is left alone: the effect shows up in the next snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if not connected, if the guard for the intent does
    /// not hold, or if sending fails.
    pub async fn perform(&mut self, intent: Intent) -> Result<ClientMessage, DispatchError> {
        if self.connection.state() == ConnectionState::Disconnected {
            return Err(DispatchError::NotConnected);
        }

        let message = self
            .dispatcher
            .translate(&intent, &self.directory, self.identity.id)?;
        self.connection.send(&message).await?;
        debug!(intent = intent.as_str(), tournament = ?message.tournament(), "Sent command");
        Ok(message)
    }

    /// Open the detail view of a tournament.
    pub fn select(&mut self, id: TournamentId) {
        self.session.select(id, &self.directory);
        self.render_detail();
        self.enrich_directory();
    }

    /// Close the detail view.
    pub fn deselect(&mut self) {
        if self.session.is_active() {
            self.session.deselect();
            self.presenter.detail_closed();
        }
    }

    /// Apply a finished profile lookup.
    pub fn on_enrichment(&mut self, enrichment: Enrichment) {
        let Enrichment { request, outcome } = enrichment;

        match request.target {
            EnrichTarget::Directory => {
                if self.profiles.complete(request.user, &outcome) {
                    self.render_list();
                    self.render_detail();
                }
            }
            EnrichTarget::MatchSlot(slot) => match outcome {
                Ok(profile) => {
                    self.matches.apply_profile(slot, request.user, &profile);
                    self.presenter.match_header(self.matches.view());
                }
                Err(e) => {
                    debug!(user = request.user, ?slot, error = %e, "Match player lookup failed");
                }
            },
        }
    }

    /// The local user's id.
    #[must_use]
    pub fn user(&self) -> UserId {
        self.identity.id
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    #[must_use]
    pub fn directory(&self) -> &TournamentDirectory {
        &self.directory
    }

    #[must_use]
    pub fn session(&self) -> &TournamentSession {
        &self.session
    }

    #[must_use]
    pub fn matches(&self) -> &MatchCoordinator {
        &self.matches
    }

    #[must_use]
    pub fn router(&self) -> &MessageRouter {
        &self.router
    }

    /// Whether the server rejected the credentials.
    #[must_use]
    pub fn is_logged_out(&self) -> bool {
        self.logged_out
    }

    fn teardown(&mut self) {
        self.directory.clear();
        if self.session.is_active() {
            self.session.deselect();
            self.presenter.detail_closed();
        }
        self.render_list();
        self.presenter.connection(ConnectionState::Disconnected);
    }

    fn render_list(&mut self) {
        let cards: Vec<_> = self
            .directory
            .iter()
            .map(|t| TournamentCard::build(t, self.identity.id, &self.profiles))
            .collect();
        self.presenter.tournaments(&cards);
    }

    fn render_detail(&mut self) {
        if self.session.is_active() {
            let view = DetailView::build(self.session.resolved(), self.identity.id, &self.profiles);
            self.presenter.detail(&view);
        }
    }

    fn enrich_directory(&mut self) {
        let mut users: Vec<UserId> = self.directory.iter().map(|t| t.creator.id).collect();
        if let Some(t) = self.session.resolved() {
            users.extend(t.players.iter().map(|p| p.id));
        }

        for user in users {
            if !self.profiles.begin(user) {
                continue;
            }
            if !self.enricher.spawn(EnrichmentRequest::directory(user)) {
                self.profiles.abandon(user);
            }
        }
    }
}
