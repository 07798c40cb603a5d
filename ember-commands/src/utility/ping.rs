use ember_core::{CommandKind, CommandSchema, Error};
use ember_framework::{BoxFuture, Command, CommandContext};
use ember_utils::embed::info_embed;

pub fn ping() -> Command {
    Command::new(CommandSchema::new(CommandKind::Combined, "ping"), run)
}

fn run(ctx: CommandContext<'_>) -> BoxFuture<'_, Result<(), Error>> {
    Box::pin(async move {
        // -1 until the shard has measured a heartbeat.
        let latency = ctx
            .invocation
            .latency
            .map(|latency| latency.as_millis().to_string())
            .unwrap_or_else(|| "-1".to_owned());

        ctx.reply(info_embed(ctx.format("ping", &[latency]))).await?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use crate::testing::{Harness, description};
    use ember_framework::Dispatch;

    #[tokio::test]
    async fn replies_with_latency_in_milliseconds() {
        let harness = Harness::new();
        let (outcome, replies) = harness.message("!ping").await;
        assert_eq!(outcome, Dispatch::Executed);
        assert_eq!(description(&replies[0]), "Bot's latency is **42** miliseconds.");
    }

    #[tokio::test]
    async fn answers_to_localized_name() {
        let harness = Harness::new();
        let (_, replies) = harness.message("!gecikme").await;
        assert_eq!(replies.len(), 1);
    }
}
