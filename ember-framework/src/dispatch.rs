use std::sync::Arc;

use serenity::all::{Context, FullEvent, UserId};
use tracing::{debug, error, warn};

use ember_core::{ConfigError, Error};
use ember_database::{Config, ConfigStore, UserStore};
use ember_locale::Language;

use crate::access::{Access, AccessContext, Denial, evaluate};
use crate::command::{Command, CommandContext};
use crate::event::{Event, EventCategory, EventContext};
use crate::helper::CommandHelper;
use crate::invocation::{Invocation, parse_message};
use crate::registry::{Registry, RegistryState};
use crate::reply::{Reply, Transport};

/// How an invocation ended when the handler did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dispatch {
    Unknown,
    Disabled,
    Denied(Denial),
    Executed,
}

pub struct Framework {
    registry: Registry,
    config: Arc<ConfigStore>,
    users: Arc<UserStore>,
}

impl Framework {
    pub fn new(registry: Registry, config: Arc<ConfigStore>, users: Arc<UserStore>) -> Self {
        Self {
            registry,
            config,
            users,
        }
    }

    /// Build the first registry generation against the configured default
    /// language.
    pub fn build(
        config: Arc<ConfigStore>,
        users: Arc<UserStore>,
        commands: Vec<Command>,
        events: Vec<Arc<Event>>,
        languages: Vec<Language>,
    ) -> Result<Self, ConfigError> {
        let default_locale = config.get().bot.default_language.clone();
        let state = RegistryState::build(commands, events, languages, &default_locale)?;
        Ok(Self::new(Registry::new(state), config, users))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> Arc<Config> {
        self.config.get()
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    /// Replace the registry with a freshly built generation. On failure the
    /// current generation keeps serving.
    pub fn rebuild(
        &self,
        commands: Vec<Command>,
        events: Vec<Arc<Event>>,
        languages: Vec<Language>,
    ) -> Result<(), ConfigError> {
        let default_locale = self.config.get().bot.default_language.clone();
        match RegistryState::build(commands, events, languages, &default_locale) {
            Ok(state) => {
                self.registry.replace(state);
                Ok(())
            }
            Err(source) => {
                error!(?source, "registry rebuild rejected; keeping previous registry");
                Err(source)
            }
        }
    }

    /// Split a message with the configured prefix into command name and tokens.
    pub fn parse_message(&self, content: &str) -> Option<(String, Vec<String>)> {
        parse_message(content, &self.config.get().commands.default_prefix)
    }

    /// The stored preference wins over the client locale; unknown locales
    /// fall back to the default language.
    pub fn resolve_language<'s>(
        &self,
        state: &'s RegistryState,
        user_id: UserId,
        locale: Option<&str>,
    ) -> &'s Arc<Language> {
        let stored = self.users.language(user_id);
        state.languages().resolve(stored.as_deref().or(locale))
    }

    /// Route one invocation to its command. Handler errors are logged and
    /// returned; the connection is never affected.
    pub async fn execute(&self, invocation: &Invocation, transport: &dyn Transport) -> Result<Dispatch, Error> {
        let state = self.registry.load();
        let Some(command) = state.command(&invocation.command_name).cloned() else {
            debug!(name = %invocation.command_name, "no command matches invocation");
            return Ok(Dispatch::Unknown);
        };

        let schema = command.schema();
        if !schema.enabled {
            debug!(command = %command.key(), "command is disabled");
            return Ok(Dispatch::Disabled);
        }

        let developers = self.config.get().developer_ids();
        let mut access_ctx = AccessContext {
            surface: invocation.surface(),
            guild_id: invocation.guild_id,
            author: invocation.author.id,
            bot_permissions: None,
            member_permissions: None,
        };
        let mut access = evaluate(schema, &access_ctx, &developers);

        let rules = &schema.access;
        let needs_bot = !rules.bot_permissions.is_empty();
        let needs_user = !rules.user_permissions.is_empty();
        if access.is_granted() && invocation.in_guild() && (needs_bot || needs_user) {
            let log_failure = |source: &Error| {
                error!(?source, command = %command.key(), "failed to resolve permissions");
            };
            if needs_bot {
                access_ctx.bot_permissions = transport.bot_permissions().await.inspect_err(log_failure)?;
            }
            if needs_user {
                access_ctx.member_permissions = transport.member_permissions().await.inspect_err(log_failure)?;
            }
            access = evaluate(schema, &access_ctx, &developers);
        }

        if let Access::Denied(denial) = access {
            debug!(command = %command.key(), %denial, "invocation denied");
            if let Some(notice) = denial.notice() {
                if let Err(source) = transport.reply(Reply::from(notice)).await {
                    warn!(?source, command = %command.key(), "failed to send denial notice");
                }
            }
            return Ok(Dispatch::Denied(denial));
        }

        let language = self.resolve_language(&state, invocation.author.id, invocation.locale.as_deref());
        let helper = CommandHelper::new(&command, invocation, transport);
        let ctx = CommandContext {
            framework: self,
            command: &command,
            invocation,
            helper: &helper,
            language,
        };

        if let Err(error) = (command.handler())(ctx).await {
            error!(?error, command = %command.key(), "command error");
            return Err(error);
        }

        Ok(Dispatch::Executed)
    }

    /// Run every claimed event handler subscribed to the event's category.
    pub async fn dispatch_event(&self, serenity: &Context, event: &FullEvent) {
        let Some(category) = EventCategory::of(event) else {
            return;
        };

        let state = self.registry.load();
        for subscription in state.events(category) {
            if !subscription.claim() {
                continue;
            }

            let ctx = EventContext {
                framework: self,
                serenity,
                event,
            };
            if let Err(error) = (subscription.handler)(ctx).await {
                error!(?error, event = %category, "event handler error");
            }
        }
    }
}
