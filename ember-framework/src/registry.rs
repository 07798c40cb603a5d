use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::info;

use ember_core::localized::LocalizedCommand;
use ember_core::{CommandSchema, ConfigError, OptionMap};
use ember_locale::{Language, LanguageSet, compile_command};

use crate::command::{Command, Handler};
use crate::event::{Event, EventCategory};

/// A command merged with its locale text and ready to dispatch.
#[derive(Debug)]
pub struct CompiledCommand {
    schema: CommandSchema,
    localized: LocalizedCommand,
    option_map: OptionMap,
    handler: Handler,
    /// Base name, distinct localized names, then aliases.
    names: Vec<String>,
    aliases_from: usize,
}

impl CompiledCommand {
    pub fn compile(command: Command, languages: &LanguageSet) -> Result<Self, ConfigError> {
        let localized = compile_command(&command.schema, languages)?;
        let option_map = OptionMap::build(&localized)?;

        let mut names = vec![localized.text.name.clone()];
        names.extend(localized.localized_names().into_iter().map(str::to_owned));
        let aliases_from = names.len();
        names.extend(command.schema.aliases.iter().cloned());

        Ok(Self {
            schema: command.schema,
            localized,
            option_map,
            handler: command.handler,
            names,
            aliases_from,
        })
    }

    pub fn key(&self) -> &str {
        &self.schema.key
    }

    /// Published base name from the default language.
    pub fn name(&self) -> &str {
        &self.localized.text.name
    }

    pub fn schema(&self) -> &CommandSchema {
        &self.schema
    }

    pub fn localized(&self) -> &LocalizedCommand {
        &self.localized
    }

    pub fn option_map(&self) -> &OptionMap {
        &self.option_map
    }

    pub fn handler(&self) -> Handler {
        self.handler
    }

    /// Every name the command answers to.
    pub fn all_names(&self) -> &[String] {
        &self.names
    }

    pub fn aliases(&self) -> &[String] {
        &self.names[self.aliases_from..]
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.names.iter().any(|candidate| candidate == name)
    }

    /// An alias repeats one of the command's own names or another alias.
    fn has_self_duplicate(&self) -> bool {
        self.aliases()
            .iter()
            .enumerate()
            .any(|(index, alias)| self.names[..self.aliases_from + index].contains(alias))
    }
}

/// One immutable generation of the command and event registry.
#[derive(Debug)]
pub struct RegistryState {
    languages: LanguageSet,
    commands: Vec<Arc<CompiledCommand>>,
    events: BTreeMap<EventCategory, Vec<Arc<Event>>>,
}

impl RegistryState {
    /// Validate and compile a whole batch. Any failure rejects the batch.
    pub fn build(
        commands: Vec<Command>,
        events: Vec<Arc<Event>>,
        languages: Vec<Language>,
        default_locale: &str,
    ) -> Result<Self, ConfigError> {
        let languages = LanguageSet::new(languages, default_locale)?;

        let compiled = commands
            .into_iter()
            .map(|command| CompiledCommand::compile(command, &languages))
            .collect::<Result<Vec<_>, _>>()?;

        check_conflicts(&compiled)?;

        let mut grouped: BTreeMap<EventCategory, Vec<Arc<Event>>> = BTreeMap::new();
        for event in events {
            grouped.entry(event.category).or_default().push(event);
        }

        info!(
            commands = compiled.len(),
            events = grouped.values().map(Vec::len).sum::<usize>(),
            languages = languages.all().len(),
            "registry built"
        );

        Ok(Self {
            languages,
            commands: compiled.into_iter().map(Arc::new).collect(),
            events: grouped,
        })
    }

    pub fn languages(&self) -> &LanguageSet {
        &self.languages
    }

    pub fn commands(&self) -> &[Arc<CompiledCommand>] {
        &self.commands
    }

    /// Look a command up by base name, localized name or alias.
    pub fn command(&self, name: &str) -> Option<&Arc<CompiledCommand>> {
        self.commands.iter().find(|command| command.has_name(name))
    }

    pub fn events(&self, category: EventCategory) -> &[Arc<Event>] {
        self.events.get(&category).map(Vec::as_slice).unwrap_or_default()
    }
}

fn check_conflicts(commands: &[CompiledCommand]) -> Result<(), ConfigError> {
    let guild_lists: Vec<String> = commands
        .iter()
        .filter(|command| command.schema.access.has_conflicting_guild_lists())
        .map(|command| command.key().to_owned())
        .collect();
    if !guild_lists.is_empty() {
        return Err(ConfigError::GuildListConflict { commands: guild_lists });
    }

    let self_duplicates: Vec<String> = commands
        .iter()
        .filter(|command| command.has_self_duplicate())
        .map(|command| command.key().to_owned())
        .collect();
    if !self_duplicates.is_empty() {
        return Err(ConfigError::AliasConflict {
            commands: self_duplicates,
        });
    }

    let mut conflicting: Vec<String> = Vec::new();
    for (index, command) in commands.iter().enumerate() {
        for other in &commands[index + 1..] {
            if command.names.iter().any(|name| other.has_name(name)) {
                for key in [command.key(), other.key()] {
                    if !conflicting.iter().any(|seen| seen == key) {
                        conflicting.push(key.to_owned());
                    }
                }
            }
        }
    }
    if !conflicting.is_empty() {
        return Err(ConfigError::NameConflict { commands: conflicting });
    }

    Ok(())
}

/// The live registry. Readers take a snapshot; a rebuild swaps the whole
/// generation at once.
pub struct Registry {
    state: ArcSwap<RegistryState>,
}

impl Registry {
    pub fn new(state: RegistryState) -> Self {
        Self {
            state: ArcSwap::from_pointee(state),
        }
    }

    pub fn load(&self) -> Arc<RegistryState> {
        self.state.load_full()
    }

    pub fn replace(&self, state: RegistryState) {
        self.state.store(Arc::new(state));
    }
}

#[cfg(test)]
mod tests {
    use super::{Registry, RegistryState};
    use crate::command::{BoxFuture, Command};
    use crate::event::{Event, EventCategory, EventContext};
    use crate::helper::tests::noop;
    use ember_core::{CommandKind, CommandSchema, ConfigError, Error};
    use ember_locale::{CommandText, Language};
    use serenity::all::GuildId;
    use std::sync::Arc;

    fn text(name: &str) -> CommandText {
        CommandText {
            name: name.to_owned(),
            description: format!("{name} command"),
            ..CommandText::default()
        }
    }

    fn english(commands: &[(&str, &str)]) -> Language {
        commands
            .iter()
            .fold(Language::new("en", vec!["en-US".to_owned()]), |language, (key, name)| {
                language.with_command_text(*key, text(name))
            })
    }

    fn turkish(commands: &[(&str, &str)]) -> Language {
        commands
            .iter()
            .fold(Language::new("tr", vec!["tr".to_owned()]), |language, (key, name)| {
                language.with_command_text(*key, text(name))
            })
    }

    fn command(key: &str) -> Command {
        Command::new(CommandSchema::new(CommandKind::Combined, key), noop)
    }

    fn on_ready(_ctx: EventContext<'_>) -> BoxFuture<'_, Result<(), Error>> {
        Box::pin(async { Ok(()) })
    }

    #[test]
    fn finds_commands_by_every_name() {
        let mut ping = command("ping");
        ping.schema = ping.schema.aliases(["p"]);
        let state = RegistryState::build(
            vec![ping],
            Vec::new(),
            vec![english(&[("ping", "ping")]), turkish(&[("ping", "gecikme")])],
            "en-US",
        )
        .unwrap();

        for name in ["ping", "gecikme", "p"] {
            assert_eq!(state.command(name).map(|command| command.key()), Some("ping"));
        }
        assert!(state.command("pong").is_none());
        assert_eq!(state.commands()[0].all_names(), ["ping", "gecikme", "p"]);
    }

    #[test]
    fn localized_name_equal_to_base_is_not_a_self_conflict() {
        let state = RegistryState::build(
            vec![command("ping")],
            Vec::new(),
            vec![english(&[("ping", "ping")]), turkish(&[("ping", "ping")])],
            "en-US",
        )
        .unwrap();
        assert_eq!(state.commands()[0].all_names(), ["ping"]);
    }

    #[test]
    fn shared_names_across_commands_conflict() {
        let mut text_command = command("text");
        text_command.schema = text_command.schema.aliases(["ping"]);
        let err = RegistryState::build(
            vec![command("ping"), text_command],
            Vec::new(),
            vec![english(&[("ping", "ping"), ("text", "text")])],
            "en-US",
        )
        .unwrap_err();

        let ConfigError::NameConflict { commands } = err else {
            panic!("expected a name conflict, got {err:?}");
        };
        assert_eq!(commands, ["ping", "text"]);
    }

    #[test]
    fn alias_repeating_own_name_conflicts() {
        let mut ping = command("ping");
        ping.schema = ping.schema.aliases(["ping"]);
        let err = RegistryState::build(vec![ping], Vec::new(), vec![english(&[("ping", "ping")])], "en-US")
            .unwrap_err();
        assert!(matches!(err, ConfigError::AliasConflict { commands } if commands == ["ping"]));

        let mut ping = command("ping");
        ping.schema = ping.schema.aliases(["p", "p"]);
        let err = RegistryState::build(vec![ping], Vec::new(), vec![english(&[("ping", "ping")])], "en-US")
            .unwrap_err();
        assert!(matches!(err, ConfigError::AliasConflict { .. }));
    }

    #[test]
    fn allow_and_deny_lists_together_are_rejected() {
        let mut ping = command("ping");
        ping.schema = ping
            .schema
            .allowed_guilds([GuildId::new(1)])
            .excluded_guilds([GuildId::new(2)]);
        let err = RegistryState::build(vec![ping], Vec::new(), vec![english(&[("ping", "ping")])], "en-US")
            .unwrap_err();
        assert!(matches!(err, ConfigError::GuildListConflict { commands } if commands == ["ping"]));
    }

    #[test]
    fn missing_default_text_rejects_the_batch() {
        let err = RegistryState::build(
            vec![command("ping"), command("text")],
            Vec::new(),
            vec![english(&[("ping", "ping")])],
            "en-US",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingCommandText { command, .. } if command == "text"));
    }

    #[test]
    fn events_are_grouped_by_category() {
        let events = vec![
            Arc::new(Event::new(EventCategory::Ready, on_ready).once()),
            Arc::new(Event::new(EventCategory::MessageCreate, on_ready)),
            Arc::new(Event::new(EventCategory::Ready, on_ready)),
        ];
        let state = RegistryState::build(Vec::new(), events, vec![english(&[])], "en-US").unwrap();
        assert_eq!(state.events(EventCategory::Ready).len(), 2);
        assert_eq!(state.events(EventCategory::MessageCreate).len(), 1);
        assert!(state.events(EventCategory::GuildCreate).is_empty());
    }

    #[test]
    fn snapshots_outlive_replacement() {
        let first = RegistryState::build(vec![command("ping")], Vec::new(), vec![english(&[("ping", "ping")])], "en-US")
            .unwrap();
        let registry = Registry::new(first);
        let snapshot = registry.load();

        let second = RegistryState::build(Vec::new(), Vec::new(), vec![english(&[])], "en-US").unwrap();
        registry.replace(second);

        assert!(snapshot.command("ping").is_some());
        assert!(registry.load().command("ping").is_none());
    }
}
