//! Telemetry utilities: standardized span constructors.

pub mod spans {
    use std::net::SocketAddr;
    use tracing::{info_span, Span};

    /// Create a span for a client session.
    pub fn session(addr: &SocketAddr) -> Span {
        info_span!("session", peer = %addr)
    }

    /// Create a span for a command execution.
    pub fn command(verb: &str, user: Option<&str>) -> Span {
        info_span!("command", verb = %verb, user = user)
    }
}
