use tracing::error;

use ember_core::option_map::Container;
use ember_core::{Error, ResolutionError};
use ember_core::entities::ResolvedUser;

use crate::invocation::{Arguments, Invocation, Surface};
use crate::parse::{OptionValue, ParseScope};
use crate::registry::CompiledCommand;
use crate::reply::{Replied, Reply, Transport};

/// Per-invocation option resolution over both surfaces.
pub struct CommandHelper<'a> {
    command: &'a CompiledCommand,
    invocation: &'a Invocation,
    transport: &'a dyn Transport,
}

impl<'a> CommandHelper<'a> {
    pub fn new(command: &'a CompiledCommand, invocation: &'a Invocation, transport: &'a dyn Transport) -> Self {
        Self {
            command,
            invocation,
            transport,
        }
    }

    pub fn surface(&self) -> Surface {
        self.invocation.surface()
    }

    pub fn author(&self) -> &'a ResolvedUser {
        &self.invocation.author
    }

    pub fn transport(&self) -> &'a dyn Transport {
        self.transport
    }

    /// Read option `key` as `T`. `Ok(None)` when the invocation did not
    /// supply it or the supplied text does not parse.
    pub fn option<T: OptionValue>(&self, key: &str) -> Result<Option<T>, ResolutionError> {
        let Some(container) = self.container() else {
            return Ok(None);
        };

        let Some(index) = container.position(key) else {
            let err = ResolutionError::UnmappedOption {
                command: self.command_path(),
                option: key.to_owned(),
            };
            error!(command = %self.command_path(), option = key, "{err}");
            return Err(err);
        };

        let descriptor = &container.options[index];
        if !descriptor.kind.accepts(T::KIND) {
            let err = ResolutionError::KindMismatch {
                command: self.command_path(),
                option: key.to_owned(),
                declared: descriptor.kind,
                requested: T::KIND,
            };
            error!(command = %self.command_path(), option = key, kind = %T::KIND, "{err}");
            return Err(err);
        }

        let scope = ParseScope {
            cache: self.transport.entities(),
            guild_id: self.invocation.guild_id,
        };

        let value = match &self.invocation.arguments {
            Arguments::Slash(arguments) => arguments
                .value(&descriptor.name)
                .and_then(|value| T::from_slash(value, scope)),
            Arguments::Message(tokens) => positional_token(tokens, container.offset, index, container.options.len())
                .and_then(|raw| T::parse(&raw, scope)),
        };

        Ok(value)
    }

    pub fn required_option<T: OptionValue>(&self, key: &str) -> Result<T, ResolutionError> {
        self.option(key)?.ok_or_else(|| {
            let err = ResolutionError::MissingRequiredOption {
                command: self.command_path(),
                option: key.to_owned(),
                kind: T::KIND,
            };
            error!(command = %self.command_path(), option = key, kind = %T::KIND, "{err}");
            err
        })
    }

    /// Key of the addressed subcommand.
    pub fn subcommand(&self) -> Option<&'a str> {
        self.container()?.subcommand.map(|subcommand| subcommand.key.as_str())
    }

    /// Key of the addressed subcommand group.
    pub fn subcommand_group(&self) -> Option<&'a str> {
        self.container()?.group.map(|group| group.key.as_str())
    }

    pub async fn reply(&self, reply: impl Into<Reply>) -> Result<Replied, Error> {
        self.transport.reply(reply.into()).await
    }

    fn container(&self) -> Option<Container<'a>> {
        let map = self.command.option_map();
        match &self.invocation.arguments {
            Arguments::Slash(arguments) => {
                map.container_for_names(arguments.group.as_deref(), arguments.subcommand.as_deref())
            }
            Arguments::Message(tokens) => map.container_for_tokens(tokens),
        }
    }

    fn command_path(&self) -> String {
        let mut path = self.command.key().to_owned();
        for part in [self.subcommand_group(), self.subcommand()].into_iter().flatten() {
            path.push(' ');
            path.push_str(part);
        }
        path
    }
}

/// The raw token for the option at `index` of `count`, after skipping
/// `offset` subcommand tokens. The last option takes every remaining token.
pub(crate) fn positional_token(tokens: &[String], offset: usize, index: usize, count: usize) -> Option<String> {
    let arguments = tokens.get(offset..)?;

    if index + 1 == count {
        let rest = arguments.get(index..)?;
        if rest.is_empty() {
            return None;
        }
        return Some(rest.join(" "));
    }

    arguments.get(index).cloned()
}
