//! In-memory collaborators for unit tests.

use arena_protocol::UserId;
use arena_transport::{
    Connected, Connection, ConnectionId, Connector, FrameStream, Inbound, TransportError,
    TransportHandle,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use crate::connection::ConnectionState;
use crate::enrichment::{EnrichmentError, UserDirectory, UserProfile};
use crate::match_view::MatchView;
use crate::presenter::{AuthSession, DetailView, GameEngine, Presenter, TournamentCard};

type InboundTx = mpsc::UnboundedSender<Result<Inbound, TransportError>>;

/// Connector that records what is sent and lets tests push inbound frames.
#[derive(Default)]
pub struct FakeConnector {
    refuse: bool,
    urls: Mutex<Vec<String>>,
    sent: Arc<Mutex<Vec<String>>>,
    close_calls: Arc<AtomicUsize>,
    inbound: Mutex<Option<InboundTx>>,
    queued: Mutex<Vec<Result<Inbound, TransportError>>>,
}

impl FakeConnector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A connector whose handshakes always fail.
    pub fn refusing() -> Arc<Self> {
        Arc::new(Self {
            refuse: true,
            ..Self::default()
        })
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn clear_sent(&self) {
        self.sent.lock().unwrap().clear();
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    /// Feed the stream of the latest connection.
    ///
    /// Frames pushed before any connection wait for the next one.
    pub fn push(&self, inbound: Result<Inbound, TransportError>) {
        match self.inbound.lock().unwrap().as_ref() {
            Some(tx) => {
                let _ = tx.send(inbound);
            }
            None => self.queued.lock().unwrap().push(inbound),
        }
    }

    pub fn push_text(&self, text: impl Into<String>) {
        self.push(Ok(Inbound::Text(text.into())));
    }

    pub fn push_close(&self, code: Option<u16>) {
        self.push(Ok(Inbound::Closed { code }));
    }
}

#[async_trait]
impl Connector for FakeConnector {
    async fn connect(&self, url: &str) -> Result<Connected, TransportError> {
        self.urls.lock().unwrap().push(url.to_string());
        if self.refuse {
            return Err(TransportError::ConnectFailed("refused".into()));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        for inbound in self.queued.lock().unwrap().drain(..) {
            let _ = tx.send(inbound);
        }
        *self.inbound.lock().unwrap() = Some(tx);

        let connection: TransportHandle = Arc::new(FakeConnection {
            id: ConnectionId::generate(),
            sent: Arc::clone(&self.sent),
            close_calls: Arc::clone(&self.close_calls),
            open: AtomicBool::new(true),
        });
        Ok(Connected {
            connection,
            stream: Box::new(FakeStream { rx }),
        })
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

struct FakeConnection {
    id: ConnectionId,
    sent: Arc<Mutex<Vec<String>>>,
    close_calls: Arc<AtomicUsize>,
    open: AtomicBool,
}

#[async_trait]
impl Connection for FakeConnection {
    fn id(&self) -> &ConnectionId {
        &self.id
    }

    async fn send_text(&self, text: String) -> Result<(), TransportError> {
        if !self.is_open() {
            return Err(TransportError::ConnectionClosed);
        }
        self.sent.lock().unwrap().push(text);
        Ok(())
    }

    async fn close(&self) -> Result<(), TransportError> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.open.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

struct FakeStream {
    rx: mpsc::UnboundedReceiver<Result<Inbound, TransportError>>,
}

#[async_trait]
impl FrameStream for FakeStream {
    async fn recv(&mut self) -> Result<Inbound, TransportError> {
        self.rx
            .recv()
            .await
            .unwrap_or(Err(TransportError::ConnectionClosed))
    }
}

/// Everything a [`RecordingPresenter`] was asked to render.
#[derive(Debug, Default)]
pub struct PresenterLog {
    pub lists: Vec<Vec<TournamentCard>>,
    pub details: Vec<DetailView>,
    pub closed: usize,
    pub headers: Vec<MatchView>,
    pub connection: Vec<ConnectionState>,
}

#[derive(Clone, Default)]
pub struct RecordingPresenter {
    pub log: Arc<Mutex<PresenterLog>>,
}

impl Presenter for RecordingPresenter {
    fn tournaments(&mut self, cards: &[TournamentCard]) {
        self.log.lock().unwrap().lists.push(cards.to_vec());
    }

    fn detail(&mut self, view: &DetailView) {
        self.log.lock().unwrap().details.push(view.clone());
    }

    fn detail_closed(&mut self) {
        self.log.lock().unwrap().closed += 1;
    }

    fn match_header(&mut self, view: &MatchView) {
        self.log.lock().unwrap().headers.push(view.clone());
    }

    fn connection(&mut self, state: ConnectionState) {
        self.log.lock().unwrap().connection.push(state);
    }
}

#[derive(Default)]
struct GameLog {
    received: Vec<serde_json::Value>,
    transports: usize,
}

/// Game engine that keeps every frame it is given.
#[derive(Clone, Default)]
pub struct RecordingGame {
    log: Arc<Mutex<GameLog>>,
}

impl RecordingGame {
    pub fn received(&self) -> Vec<serde_json::Value> {
        self.log.lock().unwrap().received.clone()
    }

    pub fn transports(&self) -> usize {
        self.log.lock().unwrap().transports
    }
}

impl GameEngine for RecordingGame {
    fn receive(&mut self, payload: &serde_json::Value) {
        self.log.lock().unwrap().received.push(payload.clone());
    }

    fn transport_changed(&mut self, _handle: TransportHandle) {
        self.log.lock().unwrap().transports += 1;
    }
}

#[derive(Clone, Default)]
pub struct CountingAuth {
    logouts: Arc<AtomicUsize>,
}

impl CountingAuth {
    pub fn logouts(&self) -> usize {
        self.logouts.load(Ordering::SeqCst)
    }
}

impl AuthSession for CountingAuth {
    fn logout(&mut self) {
        self.logouts.fetch_add(1, Ordering::SeqCst);
    }
}

/// User directory backed by a map. Unknown users answer 404.
#[derive(Default)]
pub struct FixedUsers {
    profiles: HashMap<UserId, UserProfile>,
    renamed: HashMap<UserId, String>,
    fetched: Mutex<Vec<UserId>>,
}

impl FixedUsers {
    pub fn with(mut self, user: UserId, username: &str) -> Self {
        self.profiles.insert(
            user,
            UserProfile {
                username: username.to_string(),
                ..Default::default()
            },
        );
        self
    }

    /// `user` answers `{base}-v{n}` on its n-th lookup.
    pub fn versioned(mut self, user: UserId, base: &str) -> Self {
        self.renamed.insert(user, base.to_string());
        self
    }

    pub fn fetched(&self) -> Vec<UserId> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserDirectory for FixedUsers {
    async fn fetch(&self, user: UserId) -> Result<UserProfile, EnrichmentError> {
        let lookups = {
            let mut fetched = self.fetched.lock().unwrap();
            fetched.push(user);
            fetched.iter().filter(|&&u| u == user).count()
        };
        if let Some(base) = self.renamed.get(&user) {
            return Ok(UserProfile {
                username: format!("{}-v{}", base, lookups),
                ..Default::default()
            });
        }
        self.profiles
            .get(&user)
            .cloned()
            .ok_or(EnrichmentError::Status(404))
    }
}
