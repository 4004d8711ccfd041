//! Server-to-client reply lines.
//!
//! Replies serialize through [`fmt::Display`] and parse back through
//! [`str::parse`]. The receiving side is expected to drop lines it does not
//! recognize rather than treat them as fatal.

use crate::error::ParseReplyError;
use std::fmt;
use std::str::FromStr;

/// A server-to-client line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// `login success` — the requested name was accepted.
    LoginSuccess,
    /// `login failure` — the requested name was rejected; the connection
    /// stays open and a retry with another name is allowed.
    LoginFailure,
    /// `logout success` — acknowledgment that the session is ending.
    LogoutSuccess,
    /// `msg <sender> : <text>` — a broadcast from another user.
    Msg {
        /// Username of the broadcasting user.
        sender: String,
        /// The broadcast text.
        text: String,
    },
    /// `whsp <sender> : <text>` — a private message from another user.
    Whsp {
        /// Username of the whispering user.
        sender: String,
        /// The whispered text.
        text: String,
    },
    /// `online <user>` — presence: `user` joined, or roster replay on the
    /// receiver's own login.
    Online(String),
    /// `offline <user>` — presence: `user` left.
    Offline(String),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::LoginSuccess => write!(f, "login success"),
            Reply::LoginFailure => write!(f, "login failure"),
            Reply::LogoutSuccess => write!(f, "logout success"),
            Reply::Msg { sender, text } => write!(f, "msg {} : {}", sender, text),
            Reply::Whsp { sender, text } => write!(f, "whsp {} : {}", sender, text),
            Reply::Online(user) => write!(f, "online {}", user),
            Reply::Offline(user) => write!(f, "offline {}", user),
        }
    }
}

impl FromStr for Reply {
    type Err = ParseReplyError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let unrecognized = || ParseReplyError {
            line: line.to_string(),
        };

        let (verb, body) = line.split_once(' ').ok_or_else(unrecognized)?;
        match (verb, body) {
            ("login", "success") => Ok(Reply::LoginSuccess),
            ("login", "failure") => Ok(Reply::LoginFailure),
            ("logout", "success") => Ok(Reply::LogoutSuccess),
            ("online", user) if !user.is_empty() => Ok(Reply::Online(user.to_string())),
            ("offline", user) if !user.is_empty() => Ok(Reply::Offline(user.to_string())),
            ("msg", rest) => {
                let (sender, text) = rest.split_once(" : ").ok_or_else(unrecognized)?;
                Ok(Reply::Msg {
                    sender: sender.to_string(),
                    text: text.to_string(),
                })
            }
            ("whsp", rest) => {
                let (sender, text) = rest.split_once(" : ").ok_or_else(unrecognized)?;
                Ok(Reply::Whsp {
                    sender: sender.to_string(),
                    text: text.to_string(),
                })
            }
            _ => Err(unrecognized()),
        }
    }
}
