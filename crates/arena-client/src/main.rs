//! # Arena
//!
//! Console client for Arena Pong tournaments.
//!
//! ## Usage
//!
//! ```bash
//! # Run with default settings
//! arena
//!
//! # Run with a specific config file
//! arena /path/to/arena.toml
//!
//! # Run with environment variables
//! ARENA_HOST=pong.example:8443 ARENA_IDENTITY=~/user.json arena
//! ```

mod commands;
mod config;
mod console;
mod handlers;
mod metrics;
mod users;

use anyhow::{Context, Result};
use arena_core::UserInfo;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arena=info,arena_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let path = std::env::args().nth(1);
    let config = config::Config::load(path.as_deref())?;

    let identity_path = config.identity_path();
    let identity = UserInfo::load(&identity_path).with_context(|| {
        format!(
            "No usable user info at {}, log in first",
            identity_path.display()
        )
    })?;

    tracing::info!(
        user = identity.id,
        "Starting Arena client for {}",
        config.endpoint().host
    );

    metrics::init_metrics();

    handlers::run_client(config, identity).await?;

    Ok(())
}
