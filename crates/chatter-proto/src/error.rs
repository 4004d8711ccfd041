//! Error types for the chatter protocol library.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
///
/// Malformed input never shows up here: unrecognized commands parse to
/// [`crate::Command::Invalid`] and unreadable lines are dropped inside the
/// codec. What remains is genuine transport failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error returned when a server-to-client line does not match any known
/// reply form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized reply line: {line:?}")]
pub struct ParseReplyError {
    /// The offending line.
    pub line: String,
}
