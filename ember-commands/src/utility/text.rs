use ember_core::{CommandKind, CommandSchema, Error, OptionSchema};
use ember_framework::{BoxFuture, Command, CommandContext};
use ember_utils::embed::error_embed;

pub fn text() -> Command {
    Command::new(
        CommandSchema::new(CommandKind::Combined, "text")
            .option(OptionSchema::string("message").required(true).min_length(1)),
        run,
    )
}

fn run(ctx: CommandContext<'_>) -> BoxFuture<'_, Result<(), Error>> {
    Box::pin(async move {
        match ctx.helper.option::<String>("message")? {
            Some(content) => ctx.reply(content).await?,
            None => ctx.reply(error_embed("Please provide a message.")).await?,
        };
        Ok(())
    })
}
