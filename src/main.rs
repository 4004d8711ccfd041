//! chatterd - a small multi-user chat daemon.
//!
//! Accepts concurrent client connections, tracks which usernames are
//! online, and routes broadcasts, whispers, and presence notifications
//! between them over a plain text-line protocol.

mod config;
mod error;
mod handlers;
mod network;
mod routing;
mod state;
mod telemetry;

use crate::config::Config;
use crate::handlers::Dispatcher;
use crate::network::Listener;
use crate::state::Registry;
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(server = %config.server.name, "Starting chatterd");

    // Shared state: constructed once here, passed explicitly everywhere.
    let registry = Arc::new(Registry::new());
    let dispatcher = Arc::new(Dispatcher::new());

    // Shutdown broadcast: the console watcher fires it, the listener and
    // every session subscribe to it.
    let (shutdown_tx, _) = broadcast::channel(16);

    spawn_console_watcher(config.server.shutdown_word.clone(), shutdown_tx.clone());
    info!(word = %config.server.shutdown_word, "console shutdown watcher started");

    let listener = Listener::bind(config.listen.address, registry, dispatcher, shutdown_tx).await?;
    info!(
        address = %config.listen.address,
        "Server started successfully! Now accepting clients"
    );

    listener.run().await?;

    info!("Goodbye!");
    Ok(())
}

/// Watch the server's own console for the shutdown sentinel.
///
/// EOF on stdin (detached or piped-closed console) stops the watcher
/// without shutting the server down.
fn spawn_console_watcher(word: String, shutdown_tx: broadcast::Sender<()>) {
    tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().eq_ignore_ascii_case(&word) => {
                    warn!("shutdown requested from console");
                    if shutdown_tx.send(()).is_err() {
                        error!("no shutdown receivers - server already stopped?");
                    }
                    break;
                }
                Ok(Some(_)) => {}
                Ok(None) => {
                    debug!("console input closed - watcher exiting");
                    break;
                }
                Err(e) => {
                    debug!(error = %e, "console read error - watcher exiting");
                    break;
                }
            }
        }
    });
}
