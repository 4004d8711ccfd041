//! # chatter-proto
//!
//! A Rust library for parsing and serializing the chatter line protocol.
//!
//! The protocol is a plain text-line protocol: each frame is one
//! newline-terminated line. Client-to-server lines are commands of the form
//! `<verb> <body>`, split on the first space; server-to-client lines are
//! replies such as `login success`, `msg <sender> : <text>`, or presence
//! notifications like `online <user>`.
//!
//! ## Features
//!
//! - Command parsing with first-separator-wins body splitting
//! - Reply construction and parsing for both ends of a connection
//! - Optional Tokio integration: a newline-delimited [`LineCodec`]
//!
//! ## Quick Start
//!
//! ### Parsing commands (server side)
//!
//! ```rust
//! use chatter_proto::Command;
//!
//! let cmd = Command::parse("whsp bob are you there?");
//! assert_eq!(
//!     cmd,
//!     Command::Whsp {
//!         target: "bob".to_string(),
//!         text: "are you there?".to_string(),
//!     }
//! );
//!
//! // Anything unrecognized is Invalid, never an error.
//! assert_eq!(Command::parse("gibberish"), Command::Invalid);
//! ```
//!
//! ### Building replies (server side)
//!
//! ```rust
//! use chatter_proto::Reply;
//!
//! let line = Reply::Msg {
//!     sender: "alice".to_string(),
//!     text: "hello".to_string(),
//! };
//! assert_eq!(line.to_string(), "msg alice : hello");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
#[cfg(feature = "tokio")]
pub mod line;
pub mod reply;

pub use command::Command;
pub use error::ProtocolError;
#[cfg(feature = "tokio")]
pub use line::LineCodec;
pub use reply::Reply;

/// Maximum accepted line length in bytes, terminator included.
pub const MAX_LINE_LEN: usize = 512;
