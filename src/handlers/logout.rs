//! Logout handler: acknowledge and end the session.

use super::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};
use async_trait::async_trait;
use chatter_proto::{Command, Reply};
use tracing::info;

/// Handler for the `logout` command.
///
/// The body is advisory only; the session's own identity decides what gets
/// cleaned up. Registry removal and the `offline` broadcast happen in the
/// session's teardown path, shared with implicit disconnects - here we only
/// acknowledge and signal the loop to stop.
pub struct LogoutHandler;

#[async_trait]
impl Handler for LogoutHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &Command) -> HandlerResult {
        let Command::Logout(_) = cmd else {
            return Ok(());
        };

        info!(user = ctx.state.username(), "client logged out");

        ctx.reply(Reply::LogoutSuccess).await?;
        Err(HandlerError::Quit)
    }
}
