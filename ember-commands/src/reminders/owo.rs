use std::sync::LazyLock;

use ember_core::{CommandKind, CommandSchema, Error, OptionNode, OptionSchema};
use ember_framework::{BoxFuture, Command, CommandContext, CommandRunners, Runner};

static RUNNERS: LazyLock<CommandRunners> = LazyLock::new(|| {
    CommandRunners::nested([
        ("list", Runner::Handler(list)),
        ("enable", Runner::Handler(enable)),
        ("disable", Runner::Handler(disable)),
    ])
});

pub fn owo() -> Command {
    Command::new(
        CommandSchema::new(CommandKind::Combined, "owo")
            .subcommand("list", [])
            .subcommand("enable", [OptionNode::from(OptionSchema::string("reminders"))])
            .subcommand(
                "disable",
                [
                    OptionNode::from(OptionSchema::string("reminders")),
                    OptionNode::from(OptionSchema::boolean("deneme")),
                ],
            ),
        run,
    )
}

fn run(ctx: CommandContext<'_>) -> BoxFuture<'_, Result<(), Error>> {
    Box::pin(async move {
        ctx.use_command_runners(&RUNNERS, Some(invalid_input)).await?;
        Ok(())
    })
}

fn list(ctx: CommandContext<'_>) -> BoxFuture<'_, Result<(), Error>> {
    Box::pin(async move {
        ctx.reply("Used subcommand 'List'").await?;
        Ok(())
    })
}

fn enable(ctx: CommandContext<'_>) -> BoxFuture<'_, Result<(), Error>> {
    Box::pin(async move {
        let reminders = ctx.helper.option::<String>("reminders")?;
        ctx.reply(format!("Enabled reminders: {}", reminders.as_deref().unwrap_or("(All)")))
            .await?;
        Ok(())
    })
}

fn disable(ctx: CommandContext<'_>) -> BoxFuture<'_, Result<(), Error>> {
    Box::pin(async move {
        let reminders = ctx.helper.option::<String>("reminders")?;
        let deneme = ctx.helper.option::<bool>("deneme")?;

        let mut content = format!("Disabled reminders: {}", reminders.as_deref().unwrap_or("(All)"));
        if let Some(deneme) = deneme {
            content.push_str(&format!(" (deneme: {deneme})"));
        }
        ctx.reply(content).await?;
        Ok(())
    })
}

fn invalid_input(ctx: CommandContext<'_>) -> BoxFuture<'_, Result<(), Error>> {
    Box::pin(async move {
        ctx.reply("Please give a valid input.").await?;
        Ok(())
    })
}
