use tracing::info;

use ember_core::{CommandKind, CommandSchema, Error, OptionSchema};
use ember_framework::{BoxFuture, Command, CommandContext};
use ember_utils::embed::{error_embed, info_embed, success_embed};

const CLEAR: &str = "clear";

pub fn language() -> Command {
    Command::new(
        CommandSchema::new(CommandKind::Combined, "language").option(OptionSchema::string("new-lang")),
        run,
    )
}

fn run(ctx: CommandContext<'_>) -> BoxFuture<'_, Result<(), Error>> {
    Box::pin(async move {
        let user_id = ctx.helper.author().id;
        let users = ctx.framework.users();

        let Some(requested) = ctx.helper.option::<String>("new-lang")? else {
            let user_language = users.language(user_id).unwrap_or_else(|| "(Not defined)".to_owned());
            let message = format!(
                "Display language: **{}**\nUser language: **{user_language}**",
                ctx.language.display_locale()
            );
            ctx.reply(info_embed(message)).await?;
            return Ok(());
        };

        if requested == CLEAR {
            users.clear_language(user_id)?;
            info!(user = %user_id, "user language cleared");
            ctx.reply(success_embed("Language cleared")).await?;
            return Ok(());
        }

        let state = ctx.framework.registry().load();
        if state.languages().find(&requested).is_none() {
            let available: Vec<&str> = state
                .languages()
                .all()
                .iter()
                .map(|language| language.display_locale())
                .collect();
            let message = format!(
                "Language **{requested}** not found.\nAvailable languages: {}",
                available.join(", ")
            );
            ctx.reply(error_embed(message)).await?;
            return Ok(());
        }

        users.set_language(user_id, requested.as_str())?;
        info!(user = %user_id, locale = %requested, "user language set");
        ctx.reply(success_embed(format!("Your language is set to **{requested}**")))
            .await?;
        Ok(())
    })
}
