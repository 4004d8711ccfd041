//! TCP listener that accepts incoming connections.
//!
//! The Listener binds the configured socket and spawns a [`Session`] task
//! for each incoming client. It also watches the server-wide shutdown
//! signal: on receipt it stops accepting, closes the listening socket, and
//! waits (bounded) for the live sessions to finish their teardown.

use crate::handlers::Dispatcher;
use crate::network::Session;
use crate::state::Registry;
use anyhow::Context as _;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::{error, info, instrument, warn};

/// How long shutdown waits for sessions to drain before giving up.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Accepts incoming TCP connections and spawns session tasks.
pub struct Listener {
    listener: TcpListener,
    registry: Arc<Registry>,
    dispatcher: Arc<Dispatcher>,
    shutdown_tx: broadcast::Sender<()>,
}

impl Listener {
    /// Bind the listener to the specified address.
    ///
    /// A bind failure is fatal: the caller must not keep starting up on a
    /// half-initialized server.
    pub async fn bind(
        addr: SocketAddr,
        registry: Arc<Registry>,
        dispatcher: Arc<Dispatcher>,
        shutdown_tx: broadcast::Sender<()>,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("unable to bind listener on {}", addr))?;
        info!(%addr, "listener bound");

        Ok(Self {
            listener,
            registry,
            dispatcher,
            shutdown_tx,
        })
    }

    /// Run the accept loop until shutdown is signaled.
    #[instrument(skip(self), name = "listener")]
    pub async fn run(self) -> anyhow::Result<()> {
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let mut sessions = JoinSet::new();

        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        info!(%addr, "connection accepted");
                        let session = Session::new(
                            stream,
                            addr,
                            Arc::clone(&self.registry),
                            Arc::clone(&self.dispatcher),
                            self.shutdown_tx.subscribe(),
                        );
                        sessions.spawn(session.run());
                    }
                    Err(e) => {
                        // One bad accept must not bring the server down.
                        error!(error = %e, "failed to accept connection");
                    }
                },

                // Reap finished session tasks as they complete.
                Some(_) = sessions.join_next(), if !sessions.is_empty() => {}

                _ = shutdown_rx.recv() => {
                    info!("shutdown requested - closing listener");
                    break;
                }
            }
        }

        drop(self.listener);

        // Sessions unblock through their own shutdown receivers; give their
        // teardown (registry cleanup, offline broadcasts) time to run.
        let drain = async {
            while sessions.join_next().await.is_some() {}
        };
        if tokio::time::timeout(SHUTDOWN_GRACE, drain).await.is_err() {
            warn!("shutdown grace period expired with sessions still open");
            sessions.shutdown().await;
        }

        info!("all sessions closed");
        Ok(())
    }
}
