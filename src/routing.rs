//! Message fan-out.
//!
//! Delivery is best-effort: lines go into each recipient session's outbox
//! with `try_send`, so one slow or dead recipient can never stall the
//! sending session's command loop, and a failure for one recipient never
//! affects the others.

use crate::state::{Registry, SessionTx};
use chatter_proto::Reply;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

/// Deliver `reply` to every online session except `sender_name`.
///
/// Unauthenticated sessions are never reached: only logged-in users appear
/// in the registry.
pub fn broadcast_except(registry: &Registry, sender_name: &str, reply: Reply) {
    let reply = Arc::new(reply);
    for (name, tx) in registry.peers() {
        if name == sender_name {
            continue;
        }
        deliver(&name, &tx, Arc::clone(&reply));
    }
}

/// Deliver `reply` to the one session logged in as `target`.
///
/// Returns `false` if no such user is online; the caller decides whether
/// that is worth a log line.
pub fn unicast(registry: &Registry, target: &str, reply: Reply) -> bool {
    match registry.sender_of(target) {
        Some(tx) => {
            deliver(target, &tx, Arc::new(reply));
            true
        }
        None => false,
    }
}

fn deliver(name: &str, tx: &SessionTx, reply: Arc<Reply>) {
    match tx.try_send(reply) {
        Ok(()) => {}
        Err(TrySendError::Full(reply)) => {
            warn!(user = %name, line = %reply, "recipient outbox full, dropping line");
        }
        Err(TrySendError::Closed(_)) => {
            // Session is mid-teardown; it will leave the registry shortly.
            debug!(user = %name, "recipient outbox closed, dropping line");
        }
    }
}
