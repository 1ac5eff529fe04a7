//! The client event loop.
//!
//! One `select!` waits on inbound frames, finished profile lookups and
//! console lines, and hands each to the [`ArenaClient`] in turn.

use crate::commands::{self, Command, HELP};
use crate::config::Config;
use crate::console::{ConsoleAuth, ConsoleGame, ConsolePresenter};
use crate::metrics;
use crate::users::HttpUserDirectory;
use anyhow::Result;
use arena_core::{
    ArenaClient, Collaborators, ConnectionManager, ConnectionState, Enrichment, InboundOutcome,
    Routed, UserInfo,
};
use arena_transport::{FrameStream, Inbound, TransportError, WebSocketConnector};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

type Stream = Option<Box<dyn FrameStream>>;

/// Whether the loop keeps running after a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Run the client until `quit`, end of input, or a rejected token.
///
/// # Errors
///
/// Returns an error if reading the console fails.
pub async fn run_client(config: Config, identity: UserInfo) -> Result<()> {
    if config.metrics.enabled {
        if let Err(e) = metrics::start_metrics_server(config.metrics.port) {
            error!("Failed to start metrics server: {}", e);
        }
    }

    let users = Arc::new(HttpUserDirectory::new(
        config.users_origin(),
        identity.token.clone(),
    ));
    let connector = Arc::new(WebSocketConnector::default());
    let connection = ConnectionManager::new(connector, config.endpoint());
    let (client, enrichments) = ArenaClient::new(
        identity,
        connection,
        Collaborators {
            presenter: Box::new(ConsolePresenter),
            game: Box::new(ConsoleGame::default()),
            auth: Box::new(ConsoleAuth),
            users,
        },
    );

    info!(user = client.user(), "Type `help` for commands");
    event_loop(client, enrichments, BufReader::new(tokio::io::stdin())).await?;
    info!("Client stopped");
    Ok(())
}

/// Connect, then drive the client from `input` until it stops.
///
/// Inbound frames are polled first, so a close is handled before any
/// console line that arrived with it.
async fn event_loop<R>(
    mut client: ArenaClient,
    mut enrichments: mpsc::UnboundedReceiver<Enrichment>,
    input: R,
) -> Result<ArenaClient>
where
    R: AsyncBufRead + Unpin,
{
    let mut stream = client.connect().await;
    let mut lines = input.lines();

    loop {
        tokio::select! {
            biased;

            inbound = next_inbound(&mut stream) => {
                match client.on_inbound(inbound).await {
                    InboundOutcome::Routed(Routed::Dropped) => metrics::record_dropped(),
                    InboundOutcome::Routed(routed) => {
                        if let Some(kind) = routed.kind() {
                            metrics::record_frame(kind);
                        }
                    }
                    InboundOutcome::Closed(reason) => {
                        metrics::record_disconnect(reason.as_str());
                        stream = None;
                    }
                    InboundOutcome::Failed => {
                        metrics::record_disconnect("error");
                        stream = None;
                    }
                }
                if client.is_logged_out() {
                    break;
                }
            }

            Some(enrichment) = enrichments.recv() => {
                metrics::record_lookup(enrichment.outcome.is_ok());
                client.on_enrichment(enrichment);
            }

            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if handle_line(&mut client, &mut stream, &line).await == Flow::Quit {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }

    client.disconnect().await;
    Ok(client)
}

/// Next event from the live stream; pending forever when there is none.
async fn next_inbound(stream: &mut Stream) -> Result<Inbound, TransportError> {
    match stream {
        Some(stream) => stream.recv().await,
        None => std::future::pending().await,
    }
}

async fn handle_line(client: &mut ArenaClient, stream: &mut Stream, line: &str) -> Flow {
    let command = match commands::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return Flow::Continue,
        Err(e) => {
            println!("{}", e);
            return Flow::Continue;
        }
    };

    match command {
        Command::Intent(intent) => {
            let label = intent.as_str();
            match client.perform(intent).await {
                Ok(message) => metrics::record_command(message.kind()),
                Err(e) => {
                    warn!(error = %e, "Command not sent");
                    metrics::record_rejected(label);
                }
            }
        }
        Command::Open(id) => client.select(id),
        Command::Close => client.deselect(),
        Command::Connect => {
            if let Some(connected) = client.connect().await {
                *stream = Some(connected);
            }
        }
        Command::Disconnect => {
            if client.state() == ConnectionState::Connected {
                metrics::record_disconnect("user");
            }
            client.disconnect().await;
            *stream = None;
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => return Flow::Quit,
    }

    Flow::Continue
}
