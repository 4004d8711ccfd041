//! Client-to-server command types and parsing.
//!
//! A command line is `<verb> <body>`, split on the first space. The body is
//! everything after that space, embedded spaces included. A line with no
//! space, or with a verb outside the recognized set, parses to
//! [`Command::Invalid`]; the protocol treats such lines as noise to be
//! dropped, not as errors.

use std::fmt;

/// A parsed client-to-server command.
///
/// The verb set is closed: `login`, `logout`, `msg`, `whsp`. Everything else
/// is [`Command::Invalid`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `login <name>` — request to go online under `name`.
    ///
    /// The body is carried verbatim; trimming and validation are the
    /// server's concern.
    Login(String),
    /// `logout <name>` — request to end the session.
    ///
    /// The body is carried but its content is advisory; the session's own
    /// identity is authoritative.
    Logout(String),
    /// `msg <text>` — broadcast `text` to every other online user.
    Msg(String),
    /// `whsp <target> <text>` — deliver `text` to `target` only.
    Whsp {
        /// Username the whisper is addressed to.
        target: String,
        /// The whispered text, embedded spaces included.
        text: String,
    },
    /// A line that does not match any recognized command form.
    Invalid,
}

impl Command {
    /// Parse one line into a command.
    ///
    /// Never fails: malformed input is [`Command::Invalid`]. The line is
    /// expected to already be stripped of its terminator.
    pub fn parse(line: &str) -> Command {
        let Some((verb, body)) = line.split_once(' ') else {
            return Command::Invalid;
        };

        match verb {
            "login" => Command::Login(body.to_string()),
            "logout" => Command::Logout(body.to_string()),
            "msg" => Command::Msg(body.to_string()),
            "whsp" => match body.split_once(' ') {
                Some((target, text)) => Command::Whsp {
                    target: target.to_string(),
                    text: text.to_string(),
                },
                // A whisper needs both a target and a text.
                None => Command::Invalid,
            },
            _ => Command::Invalid,
        }
    }

    /// The wire verb for this command, or `None` for [`Command::Invalid`].
    pub fn verb(&self) -> Option<&'static str> {
        match self {
            Command::Login(_) => Some("login"),
            Command::Logout(_) => Some("logout"),
            Command::Msg(_) => Some("msg"),
            Command::Whsp { .. } => Some("whsp"),
            Command::Invalid => None,
        }
    }
}

impl fmt::Display for Command {
    /// Serialize to the wire form. [`Command::Invalid`] has no wire form and
    /// renders as an empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Login(name) => write!(f, "login {}", name),
            Command::Logout(name) => write!(f, "logout {}", name),
            Command::Msg(text) => write!(f, "msg {}", text),
            Command::Whsp { target, text } => write!(f, "whsp {} {}", target, text),
            Command::Invalid => Ok(()),
        }
    }
}
