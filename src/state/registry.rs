//! Online-user bookkeeping.
//!
//! The [`Registry`] is the only cross-session shared mutable state in the
//! server: which usernames are online right now, which were seen before and
//! are offline, and the outbox handle of the session that owns each online
//! name. Every access goes through its methods; the lock is never held
//! across an await point.

use chatter_proto::Reply;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

/// Sending half of a session's outbox.
///
/// Stored in the registry under the session's username; fan-out and unicast
/// deliver through clones of this handle.
pub type SessionTx = mpsc::Sender<Arc<Reply>>;

/// Error returned when a login name is already claimed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("username already online: {0}")]
pub struct AlreadyOnline(pub String);

/// The three user sets, guarded together.
///
/// `online` doubles as the username-to-session map: a key is present exactly
/// when that user is online, and its value is the owning session's outbox.
/// Keeping all sets under one lock makes the online/offline disjointness a
/// matter of a single critical section per transition.
#[derive(Default)]
struct Inner {
    online: HashMap<String, SessionTx>,
    offline: HashSet<String>,
    seen: HashSet<String>,
}

/// Process-wide user registry.
#[derive(Default)]
pub struct Registry {
    inner: RwLock<Inner>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` currently has an active session.
    pub fn is_online(&self, name: &str) -> bool {
        self.inner.read().online.contains_key(name)
    }

    /// Whether `name` was ever accepted during this process's lifetime.
    pub fn has_been_seen(&self, name: &str) -> bool {
        self.inner.read().seen.contains(name)
    }

    /// Claim `name` for a session.
    ///
    /// Atomic test-and-set: if the name is already online the existing
    /// owner is left untouched and `AlreadyOnline` is returned. On success
    /// the returned roster is the set of *other* online usernames exactly as
    /// it stood at the moment of the claim, for replay to the new session.
    pub fn add_online(&self, name: &str, tx: SessionTx) -> Result<Vec<String>, AlreadyOnline> {
        let mut inner = self.inner.write();
        if inner.online.contains_key(name) {
            return Err(AlreadyOnline(name.to_string()));
        }

        let roster = inner.online.keys().cloned().collect();
        inner.online.insert(name.to_string(), tx);
        inner.offline.remove(name);
        inner.seen.insert(name.to_string());
        Ok(roster)
    }

    /// Move `name` from online to offline.
    ///
    /// Idempotent: returns `false` without touching anything if the name
    /// was not online, so duplicate teardown paths cannot double-announce.
    pub fn remove_online(&self, name: &str) -> bool {
        let mut inner = self.inner.write();
        if inner.online.remove(name).is_none() {
            return false;
        }
        inner.offline.insert(name.to_string());
        true
    }

    /// Snapshot of every online session for fan-out.
    ///
    /// Copy-on-read: callers iterate the snapshot with no lock held.
    pub fn peers(&self) -> Vec<(String, SessionTx)> {
        self.inner
            .read()
            .online
            .iter()
            .map(|(name, tx)| (name.clone(), tx.clone()))
            .collect()
    }

    /// Look up the outbox of one online user.
    pub fn sender_of(&self, name: &str) -> Option<SessionTx> {
        self.inner.read().online.get(name).cloned()
    }

    /// Number of users currently online.
    pub fn online_count(&self) -> usize {
        self.inner.read().online.len()
    }

    /// Number of users seen before and not online now.
    pub fn offline_count(&self) -> usize {
        self.inner.read().offline.len()
    }
}
