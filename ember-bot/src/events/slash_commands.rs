use serenity::all::{FullEvent, Interaction};
use tracing::warn;

use ember_core::Error;
use ember_framework::{BoxFuture, EventContext, Reply, Transport};
use ember_utils::embed::command_error_embed;

use crate::gateway::{InteractionTransport, interaction_invocation};

pub(super) fn run(ctx: EventContext<'_>) -> BoxFuture<'_, Result<(), Error>> {
    Box::pin(async move {
        let FullEvent::InteractionCreate { interaction } = ctx.event else {
            return Ok(());
        };
        let Interaction::Command(command) = interaction else {
            return Ok(());
        };
        if command.user.bot {
            return Ok(());
        }

        let invocation = interaction_invocation(ctx.serenity, command).await;
        let transport = InteractionTransport::new(ctx.serenity, command);

        // Already logged by the framework.
        if ctx.framework.execute(&invocation, &transport).await.is_err() {
            let reply = Reply::from(command_error_embed()).ephemeral(true);
            if let Err(error) = transport.reply(reply).await {
                warn!(?error, command = %invocation.command_name, "failed to send command error notice");
            }
        }
        Ok(())
    })
}
