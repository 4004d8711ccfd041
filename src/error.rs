//! Unified error handling for chatterd.
//!
//! Command handlers report failures through [`HandlerError`]; the dispatcher
//! decides which failures produce a client-visible reply, which are dropped
//! silently, and which terminate the session.

use chatter_proto::Reply;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during command handling.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("username already online: {0}")]
    NameInUse(String),

    #[error("unusable username: {0:?}")]
    ErroneousUsername(String),

    #[error("already logged in")]
    AlreadyLoggedIn,

    #[error("not logged in")]
    NotLoggedIn,

    #[error("no such user online: {0}")]
    NoSuchUser(String),

    #[error("whisper to self")]
    SelfWhisper,

    /// End the session cleanly (explicit logout).
    #[error("session ended")]
    Quit,

    #[error("send error: {0}")]
    Send(#[from] mpsc::error::SendError<Arc<Reply>>),
}

impl HandlerError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NameInUse(_) => "name_in_use",
            Self::ErroneousUsername(_) => "erroneous_username",
            Self::AlreadyLoggedIn => "already_logged_in",
            Self::NotLoggedIn => "not_logged_in",
            Self::NoSuchUser(_) => "no_such_user",
            Self::SelfWhisper => "self_whisper",
            Self::Quit => "quit",
            Self::Send(_) => "send_error",
        }
    }

    /// Convert to a client-visible reply.
    ///
    /// Returns `None` for failures that are dropped without a reply
    /// (bad whisper targets, commands before login) and for the
    /// session-terminating variants.
    pub fn to_reply(&self) -> Option<Reply> {
        match self {
            Self::NameInUse(_) | Self::ErroneousUsername(_) | Self::AlreadyLoggedIn => {
                Some(Reply::LoginFailure)
            }

            // Rejected silently: the connection just carries on.
            Self::NotLoggedIn | Self::NoSuchUser(_) | Self::SelfWhisper => None,

            Self::Quit | Self::Send(_) => None,
        }
    }

    /// Whether this error ends the session's command loop.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Quit | Self::Send(_))
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;
