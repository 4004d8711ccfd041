//! Per-connection session: the command loop.
//!
//! Each accepted connection gets one [`Session`] running in its own task.
//! Its event loop multiplexes three sources: lines read from the client,
//! lines queued by other sessions (and its own handlers) into the outbox,
//! and the server-wide shutdown signal. The framed read is the loop's only
//! long-lived suspension point.

use crate::error::HandlerError;
use crate::handlers::{Context, Dispatcher};
use crate::routing;
use crate::state::{Registry, SessionState};
use crate::telemetry;
use chatter_proto::{Command, LineCodec, Reply};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc};
use tokio_util::codec::Framed;
use tracing::{debug, info, warn, Instrument};

/// Queued lines per session before fan-out starts dropping.
const OUTBOX_CAPACITY: usize = 1024;

/// One client connection and its command loop.
pub struct Session {
    stream: TcpStream,
    addr: SocketAddr,
    registry: Arc<Registry>,
    dispatcher: Arc<Dispatcher>,
    shutdown_rx: broadcast::Receiver<()>,
}

impl Session {
    pub fn new(
        stream: TcpStream,
        addr: SocketAddr,
        registry: Arc<Registry>,
        dispatcher: Arc<Dispatcher>,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            stream,
            addr,
            registry,
            dispatcher,
            shutdown_rx,
        }
    }

    /// Run the session until logout, disconnect, or server shutdown.
    pub async fn run(self) {
        let span = telemetry::spans::session(&self.addr);
        self.run_inner().instrument(span).await;
    }

    async fn run_inner(mut self) {
        let (tx, mut rx) = mpsc::channel::<Arc<Reply>>(OUTBOX_CAPACITY);
        let mut framed = Framed::new(self.stream, LineCodec::new());
        let mut state = SessionState::default();

        loop {
            tokio::select! {
                line = framed.next() => match line {
                    Some(Ok(line)) => {
                        let cmd = Command::parse(&line);
                        if cmd == Command::Invalid {
                            debug!(line = %line, "ignoring malformed line");
                            continue;
                        }

                        let mut ctx = Context {
                            registry: &self.registry,
                            sender: &tx,
                            state: &mut state,
                            remote_addr: self.addr,
                        };
                        match self.dispatcher.dispatch(&mut ctx, &cmd).await {
                            Ok(()) => {}
                            Err(HandlerError::Quit) => break,
                            Err(e) => {
                                warn!(error = %e, "session error - disconnecting");
                                break;
                            }
                        }
                    }
                    Some(Err(e)) => {
                        // Unreadable lines are dropped inside the codec;
                        // what reaches here is transport failure.
                        debug!(error = %e, "read error - treating as disconnect");
                        break;
                    }
                    None => {
                        info!("client disconnected");
                        break;
                    }
                },

                Some(reply) = rx.recv() => {
                    if let Err(e) = framed.send(reply.to_string()).await {
                        warn!(error = %e, "write error - disconnecting");
                        break;
                    }
                }

                _ = self.shutdown_rx.recv() => {
                    info!("server shutting down - closing connection");
                    break;
                }
            }
        }

        // Flush queued terminal replies (e.g. "logout success") before the
        // socket closes; failures here are moot.
        while let Ok(reply) = rx.try_recv() {
            if framed.send(reply.to_string()).await.is_err() {
                break;
            }
        }

        Self::teardown(&self.registry, &mut state);
    }

    /// Shared cleanup for every exit path: explicit logout, read failure,
    /// EOF, and server shutdown all converge here.
    ///
    /// `remove_online` is idempotent, so the offline announcement goes out
    /// at most once no matter how the session ended.
    fn teardown(registry: &Registry, state: &mut SessionState) {
        if let Some(name) = state.username.take() {
            if registry.remove_online(&name) {
                routing::broadcast_except(registry, &name, Reply::Offline(name.clone()));
                info!(
                    user = %name,
                    online = registry.online_count(),
                    offline = registry.offline_count(),
                    "user went offline"
                );
            }
        }
    }
}
