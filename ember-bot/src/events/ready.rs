use serenity::all::FullEvent;
use tracing::info;

use ember_core::Error;
use ember_framework::{BoxFuture, EventContext, register};

pub(super) fn run(ctx: EventContext<'_>) -> BoxFuture<'_, Result<(), Error>> {
    Box::pin(async move {
        let FullEvent::Ready { data_about_bot } = ctx.event else {
            return Ok(());
        };
        info!(user = %data_about_bot.user.name, shards = ?data_about_bot.shard, "Ember has awoken!");

        let state = ctx.framework.registry().load();
        register::publish(&ctx.serenity.http, &state).await?;
        Ok(())
    })
}
