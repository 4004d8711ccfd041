//! Command handlers and dispatch.
//!
//! One handler per wire verb, dispatched through a verb-keyed table. The
//! handlers only ever touch shared state through the registry and only ever
//! reach other sessions through the routing helpers.

mod dispatch;
mod login;
mod logout;
mod message;
mod whisper;

pub use dispatch::Dispatcher;
pub use login::LoginHandler;
pub use logout::LogoutHandler;
pub use message::MsgHandler;
pub use whisper::WhspHandler;

use crate::error::HandlerError;
use crate::state::{Registry, SessionState, SessionTx};
use async_trait::async_trait;
use chatter_proto::{Command, Reply};
use std::net::SocketAddr;
use std::sync::Arc;

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// Shared user registry.
    pub registry: &'a Arc<Registry>,
    /// Sender for outgoing lines to this session's own client.
    pub sender: &'a SessionTx,
    /// This session's mutable state.
    pub state: &'a mut SessionState,
    /// Remote address of the client.
    pub remote_addr: SocketAddr,
}

impl Context<'_> {
    /// Queue a reply line to this session's own client.
    #[inline]
    pub async fn reply(&self, reply: Reply) -> Result<(), HandlerError> {
        self.sender.send(Arc::new(reply)).await?;
        Ok(())
    }
}

/// A command handler for one wire verb.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &Command) -> crate::error::HandlerResult;
}
