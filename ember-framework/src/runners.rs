use std::collections::BTreeMap;

use ember_core::Error;

use crate::command::{CommandContext, Handler};
use crate::helper::CommandHelper;

/// A subcommand handler, or the subcommand handlers of one group.
#[derive(Clone, Debug)]
pub enum Runner {
    Handler(Handler),
    Group(BTreeMap<String, Handler>),
}

impl Runner {
    pub fn group<'a>(entries: impl IntoIterator<Item = (&'a str, Handler)>) -> Self {
        Self::Group(
            entries
                .into_iter()
                .map(|(key, handler)| (key.to_owned(), handler))
                .collect(),
        )
    }
}

/// Handler selection for a command, keyed by subcommand and group keys.
#[derive(Clone, Debug)]
pub enum CommandRunners {
    Single(Handler),
    Nested(BTreeMap<String, Runner>),
}

impl CommandRunners {
    pub fn nested<'a>(entries: impl IntoIterator<Item = (&'a str, Runner)>) -> Self {
        Self::Nested(
            entries
                .into_iter()
                .map(|(key, runner)| (key.to_owned(), runner))
                .collect(),
        )
    }

    /// The handler addressed by the invocation, if any.
    pub fn select(&self, helper: &CommandHelper<'_>) -> Option<Handler> {
        let map = match self {
            Self::Single(handler) => return Some(*handler),
            Self::Nested(map) => map,
        };

        let subcommand = helper.subcommand()?;
        match helper.subcommand_group() {
            Some(group) => match map.get(group)? {
                Runner::Group(handlers) => handlers.get(subcommand).copied(),
                Runner::Handler(_) => None,
            },
            None => match map.get(subcommand)? {
                Runner::Handler(handler) => Some(*handler),
                Runner::Group(_) => None,
            },
        }
    }
}

/// Run the handler selected by the invocation's subcommand path. Falls back
/// to `fallback` when nothing matches. `Ok(true)` only when a runner ran.
pub async fn use_command_runners(
    ctx: CommandContext<'_>,
    runners: &CommandRunners,
    fallback: Option<Handler>,
) -> Result<bool, Error> {
    if let Some(handler) = runners.select(ctx.helper) {
        handler(ctx).await?;
        return Ok(true);
    }

    if let Some(fallback) = fallback {
        fallback(ctx).await?;
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{CommandRunners, Runner};
    use crate::command::{BoxFuture, Command, CommandContext, Handler};
    use crate::helper::CommandHelper;
    use crate::helper::tests::{MockTransport, invocation, noop, option_text};
    use crate::invocation::{Arguments, SlashArguments};
    use crate::registry::CompiledCommand;
    use ember_core::{CommandKind, CommandSchema, Error, OptionNode, OptionSchema};
    use ember_locale::text::{CommandText, GroupText, OptionText, SubcommandText};
    use ember_locale::{Language, LanguageSet};

    fn list(_ctx: CommandContext<'_>) -> BoxFuture<'_, Result<(), Error>> {
        Box::pin(async { Ok(()) })
    }

    fn subcommand_text(name: &str, options: Vec<OptionText>) -> SubcommandText {
        SubcommandText {
            key: None,
            name: name.to_owned(),
            description: name.to_owned(),
            options,
        }
    }

    fn command() -> CompiledCommand {
        let schema = CommandSchema::new(CommandKind::Combined, "settings")
            .subcommand("list", [])
            .group(
                "config",
                [OptionNode::subcommand("set", [OptionNode::from(OptionSchema::string("value"))])],
            );
        let text = CommandText {
            name: "settings".to_owned(),
            description: "settings".to_owned(),
            subcommands: vec![subcommand_text("list", Vec::new())],
            subcommand_groups: vec![GroupText {
                key: None,
                name: "config".to_owned(),
                description: "config".to_owned(),
                subcommands: vec![subcommand_text("set", vec![option_text("value")])],
            }],
            ..CommandText::default()
        };
        let en = Language::new("en", vec!["en-US".to_owned()]).with_command_text("settings", text);
        let languages = LanguageSet::new(vec![en], "en-US").unwrap();
        CompiledCommand::compile(Command::new(schema, noop), &languages).unwrap()
    }

    fn runners() -> CommandRunners {
        CommandRunners::nested([
            ("list", Runner::Handler(list)),
            ("config", Runner::group([("set", list as Handler)])),
        ])
    }

    fn tokens(raw: &[&str]) -> Arguments {
        Arguments::Message(raw.iter().map(|token| (*token).to_owned()).collect())
    }

    #[test]
    fn selects_subcommand_and_group_runners() {
        let command = command();
        let transport = MockTransport::default();

        for raw in [&["list"][..], &["config", "set", "x"][..]] {
            let invocation = invocation(tokens(raw));
            let helper = CommandHelper::new(&command, &invocation, &transport);
            assert!(runners().select(&helper).is_some(), "no runner for {raw:?}");
        }

        let invocation = invocation(Arguments::Slash(SlashArguments {
            group: Some("config".to_owned()),
            subcommand: Some("set".to_owned()),
            values: Vec::new(),
        }));
        let helper = CommandHelper::new(&command, &invocation, &transport);
        assert!(runners().select(&helper).is_some());
    }

    #[test]
    fn unmatched_paths_select_nothing() {
        let command = command();
        let transport = MockTransport::default();

        for raw in [&[][..], &["config"][..], &["unknown"][..], &["config", "unset"][..]] {
            let invocation = invocation(tokens(raw));
            let helper = CommandHelper::new(&command, &invocation, &transport);
            assert!(runners().select(&helper).is_none(), "runner selected for {raw:?}");
        }
    }

    #[test]
    fn runner_shape_must_match_invocation_shape() {
        let command = command();
        let transport = MockTransport::default();
        let flipped = CommandRunners::nested([
            ("list", Runner::group([("set", list as Handler)])),
            ("config", Runner::Handler(list)),
        ]);

        for raw in [&["list"][..], &["config", "set"][..]] {
            let invocation = invocation(tokens(raw));
            let helper = CommandHelper::new(&command, &invocation, &transport);
            assert!(flipped.select(&helper).is_none());
        }
    }

    #[test]
    fn single_runner_always_selects() {
        let command = command();
        let transport = MockTransport::default();
        let invocation = invocation(tokens(&[]));
        let helper = CommandHelper::new(&command, &invocation, &transport);
        assert!(CommandRunners::Single(list).select(&helper).is_some());
    }
}
