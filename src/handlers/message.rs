//! Broadcast message handler.

use super::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};
use crate::routing;
use async_trait::async_trait;
use chatter_proto::{Command, Reply};

/// Handler for the `msg` command.
///
/// Fans the text out as `msg <sender> : <text>` to every other online
/// session. The sender gets no echo; its own client is responsible for
/// local echo.
pub struct MsgHandler;

#[async_trait]
impl Handler for MsgHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &Command) -> HandlerResult {
        let Command::Msg(text) = cmd else {
            return Ok(());
        };

        let Some(sender) = ctx.state.username() else {
            return Err(HandlerError::NotLoggedIn);
        };

        routing::broadcast_except(
            ctx.registry,
            sender,
            Reply::Msg {
                sender: sender.to_string(),
                text: text.clone(),
            },
        );
        Ok(())
    }
}
