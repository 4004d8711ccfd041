//! Private message (whisper) handler.

use super::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};
use crate::routing;
use async_trait::async_trait;
use chatter_proto::{Command, Reply};

/// Handler for the `whsp` command.
///
/// Delivers `whsp <sender> : <text>` to the target's session only. Whispers
/// are fire-and-forget: no mailbox for offline targets, no error reply to
/// the sender - a bad target is rejected with nothing but a log line.
pub struct WhspHandler;

#[async_trait]
impl Handler for WhspHandler {
    async fn handle(&self, ctx: &mut Context<'_>, cmd: &Command) -> HandlerResult {
        let Command::Whsp { target, text } = cmd else {
            return Ok(());
        };

        let Some(sender) = ctx.state.username() else {
            return Err(HandlerError::NotLoggedIn);
        };

        if target == sender {
            return Err(HandlerError::SelfWhisper);
        }

        let reply = Reply::Whsp {
            sender: sender.to_string(),
            text: text.clone(),
        };
        if !routing::unicast(ctx.registry, target, reply) {
            return Err(HandlerError::NoSuchUser(target.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{drain, Fixture};

    fn whisper(target: &str, text: &str) -> Command {
        Command::Whsp {
            target: target.to_string(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn whisper_reaches_only_the_target() {
        let mut fixture = Fixture::logged_in("alice");
        let mut bob = fixture.peer("bob");
        let mut carol = fixture.peer("carol");

        WhspHandler
            .handle(&mut fixture.context(), &whisper("bob", "you there?"))
            .await
            .unwrap();

        assert_eq!(
            drain(&mut bob),
            vec![Reply::Whsp {
                sender: "alice".into(),
                text: "you there?".into(),
            }]
        );
        assert!(drain(&mut carol).is_empty());
        assert!(fixture.replies().is_empty());
    }

    #[tokio::test]
    async fn self_whisper_is_rejected() {
        let mut fixture = Fixture::logged_in("alice");

        let result = WhspHandler
            .handle(&mut fixture.context(), &whisper("alice", "hi me"))
            .await;

        assert!(matches!(result, Err(HandlerError::SelfWhisper)));
        assert!(fixture.replies().is_empty());
    }

    #[tokio::test]
    async fn whisper_to_offline_user_is_dropped() {
        let mut fixture = Fixture::logged_in("alice");

        let result = WhspHandler
            .handle(&mut fixture.context(), &whisper("ghost", "hello?"))
            .await;

        assert!(matches!(result, Err(HandlerError::NoSuchUser(_))));
        assert!(fixture.replies().is_empty());
    }

    #[tokio::test]
    async fn whisper_before_login_is_rejected() {
        let mut fixture = Fixture::new();
        let mut bob = fixture.peer("bob");

        let result = WhspHandler
            .handle(&mut fixture.context(), &whisper("bob", "psst"))
            .await;

        assert!(matches!(result, Err(HandlerError::NotLoggedIn)));
        assert!(drain(&mut bob).is_empty());
    }
}
