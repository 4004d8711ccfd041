//! Login handler: claim a username and announce presence.

use super::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};
use crate::routing;
use async_trait::async_trait;
use chatter_proto::{Command, Reply};
use tracing::info;

/// Handler for the `login` command.
///
/// On success the new session receives `login success` followed by one
/// `online <user>` line per already-online user (the roster replay - there
/// is no separate user-list query), and everyone else receives a single
/// `online <name>`. On failure the connection stays open so the client can
/// retry with another name.
pub struct LoginHandler;

#[async_trait]
impl Handler for LoginHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &Command) -> HandlerResult {
        let Command::Login(body) = cmd else {
            return Ok(());
        };

        if ctx.state.is_authenticated() {
            return Err(HandlerError::AlreadyLoggedIn);
        }

        let name = body.trim();
        // Whispers address their target by the first space-delimited token,
        // so a name containing whitespace would be unreachable.
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(HandlerError::ErroneousUsername(name.to_string()));
        }

        if ctx.registry.is_online(name) {
            return Err(HandlerError::NameInUse(name.to_string()));
        }
        let returning = ctx.registry.has_been_seen(name);

        // The claim itself re-checks under the write lock; two racing
        // logins for the same name cannot both get past it.
        let roster = ctx
            .registry
            .add_online(name, ctx.sender.clone())
            .map_err(|e| HandlerError::NameInUse(e.0))?;

        ctx.state.username = Some(name.to_string());

        ctx.reply(Reply::LoginSuccess).await?;
        for user in roster {
            ctx.reply(Reply::Online(user)).await?;
        }
        routing::broadcast_except(ctx.registry, name, Reply::Online(name.to_string()));

        info!(
            user = %name,
            online = ctx.registry.online_count(),
            returning,
            "user logged in"
        );
        Ok(())
    }
}
