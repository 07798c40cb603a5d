use serenity::all::FullEvent;
use tracing::warn;

use ember_core::Error;
use ember_framework::{BoxFuture, EventContext, Reply, Transport};
use ember_utils::embed::command_error_embed;

use crate::gateway::{MessageTransport, message_invocation};

pub(super) fn run(ctx: EventContext<'_>) -> BoxFuture<'_, Result<(), Error>> {
    Box::pin(async move {
        let FullEvent::Message { new_message } = ctx.event else {
            return Ok(());
        };
        if new_message.author.bot || new_message.webhook_id.is_some() {
            return Ok(());
        }

        let Some((command_name, tokens)) = ctx.framework.parse_message(&new_message.content) else {
            return Ok(());
        };

        let invocation = message_invocation(ctx.serenity, new_message, command_name, tokens).await;
        let transport = MessageTransport::new(ctx.serenity, new_message);

        if ctx.framework.execute(&invocation, &transport).await.is_err() {
            if let Err(error) = transport.reply(Reply::from(command_error_embed())).await {
                warn!(?error, command = %invocation.command_name, "failed to send command error notice");
            }
        }
        Ok(())
    })
}
