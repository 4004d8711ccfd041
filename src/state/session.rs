//! Per-connection session state.

/// Mutable state owned by one connection's command loop.
///
/// A session starts unauthenticated; `username` is set by a successful
/// login and cleared when the session is torn down.
#[derive(Debug, Default)]
pub struct SessionState {
    /// The username this session is logged in as, if any.
    pub username: Option<String>,
}

impl SessionState {
    /// The logged-in username, if authenticated.
    #[inline]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Whether a login has completed on this session.
    #[inline]
    pub fn is_authenticated(&self) -> bool {
        self.username.is_some()
    }
}
