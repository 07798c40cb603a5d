use std::future::Future;
use std::pin::Pin;

use ember_core::{CommandSchema, Error};
use ember_locale::Language;

use crate::dispatch::Framework;
use crate::helper::CommandHelper;
use crate::invocation::Invocation;
use crate::registry::CompiledCommand;
use crate::reply::{Replied, Reply};
use crate::runners::{CommandRunners, use_command_runners};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Entry point of a command. One handler serves both surfaces.
pub type Handler = for<'a> fn(CommandContext<'a>) -> BoxFuture<'a, Result<(), Error>>;

/// A command declaration: its schema plus the handler that runs it.
#[derive(Clone, Debug)]
pub struct Command {
    pub schema: CommandSchema,
    pub handler: Handler,
}

impl Command {
    pub fn new(schema: CommandSchema, handler: Handler) -> Self {
        Self { schema, handler }
    }
}

/// Everything a handler gets for one invocation.
#[derive(Clone, Copy)]
pub struct CommandContext<'a> {
    pub framework: &'a Framework,
    pub command: &'a CompiledCommand,
    pub invocation: &'a Invocation,
    pub helper: &'a CommandHelper<'a>,
    pub language: &'a Language,
}

impl<'a> CommandContext<'a> {
    /// Language text for `key`, or the key itself when the language lacks it.
    pub fn text(&self, key: &str) -> String {
        self.language.text(key).unwrap_or(key).to_owned()
    }

    pub fn format<S: AsRef<str>>(&self, key: &str, args: &[S]) -> String {
        self.language.format(key, args).unwrap_or_else(|| key.to_owned())
    }

    pub async fn reply(&self, reply: impl Into<Reply>) -> Result<Replied, Error> {
        self.helper.reply(reply).await
    }

    pub async fn use_command_runners(
        &self,
        runners: &CommandRunners,
        fallback: Option<Handler>,
    ) -> Result<bool, Error> {
        use_command_runners(*self, runners, fallback).await
    }
}
