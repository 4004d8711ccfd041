//! Command dispatch table.

use super::{Context, Handler, LoginHandler, LogoutHandler, MsgHandler, WhspHandler};
use crate::error::HandlerResult;
use crate::telemetry;
use chatter_proto::Command;
use std::collections::HashMap;
use tracing::{debug, Instrument};

/// Registry of command handlers, keyed by wire verb.
pub struct Dispatcher {
    handlers: HashMap<&'static str, Box<dyn Handler>>,
}

impl Dispatcher {
    /// Create a dispatcher with all handlers registered.
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, Box<dyn Handler>> = HashMap::new();

        handlers.insert("login", Box::new(LoginHandler));
        handlers.insert("logout", Box::new(LogoutHandler));
        handlers.insert("msg", Box::new(MsgHandler));
        handlers.insert("whsp", Box::new(WhspHandler));

        Self { handlers }
    }

    /// Dispatch a parsed command to its handler.
    ///
    /// Malformed lines ([`Command::Invalid`]) are dropped here. Rejected
    /// operations are converted to a failure reply or a silent drop; only
    /// the terminal errors (logout, dead outbox) reach the caller.
    pub async fn dispatch(&self, ctx: &mut Context<'_>, cmd: &Command) -> HandlerResult {
        let Some(verb) = cmd.verb() else {
            debug!(peer = %ctx.remote_addr, "ignoring malformed line");
            return Ok(());
        };

        // The verb table covers the whole closed command set.
        let Some(handler) = self.handlers.get(verb) else {
            debug!(verb, "ignoring unhandled verb");
            return Ok(());
        };

        let span = telemetry::spans::command(verb, ctx.state.username());
        match handler.handle(ctx, cmd).instrument(span).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_terminal() => Err(e),
            Err(e) => {
                debug!(verb, code = e.error_code(), error = %e, "command rejected");
                if let Some(reply) = e.to_reply() {
                    ctx.reply(reply).await?;
                }
                Ok(())
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
