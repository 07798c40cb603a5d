use std::time::Duration;

use serenity::all::{ChannelId, GuildId};

use ember_core::entities::{ResolvedChannel, ResolvedMember, ResolvedRole, ResolvedUser};

/// Which invocation surface a request arrived on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Surface {
    Slash,
    Message,
}

/// A pre-typed value carried by a structured interaction.
#[derive(Clone, Debug, PartialEq)]
pub enum SlashValue {
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    User(ResolvedUser, Option<ResolvedMember>),
    Role(ResolvedRole),
    Channel(ResolvedChannel),
}

/// Arguments of a structured interaction, keyed by published base names.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SlashArguments {
    pub group: Option<String>,
    pub subcommand: Option<String>,
    pub values: Vec<(String, SlashValue)>,
}

impl SlashArguments {
    pub fn value(&self, name: &str) -> Option<&SlashValue> {
        self.values
            .iter()
            .find(|(option, _)| option == name)
            .map(|(_, value)| value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Arguments {
    Slash(SlashArguments),
    /// Tokens after the command name.
    Message(Vec<String>),
}

/// One incoming request, reduced to what dispatch and option resolution need.
#[derive(Clone, Debug)]
pub struct Invocation {
    pub command_name: String,
    pub arguments: Arguments,
    pub guild_id: Option<GuildId>,
    pub channel_id: ChannelId,
    pub author: ResolvedUser,
    /// Client locale reported by structured interactions.
    pub locale: Option<String>,
    pub latency: Option<Duration>,
}

impl Invocation {
    pub fn surface(&self) -> Surface {
        match self.arguments {
            Arguments::Slash(_) => Surface::Slash,
            Arguments::Message(_) => Surface::Message,
        }
    }

    pub fn in_guild(&self) -> bool {
        self.guild_id.is_some()
    }
}

/// Split a prefixed message into its lowercased command name and argument
/// tokens. `None` when the prefix is missing or nothing follows it.
pub fn parse_message(content: &str, prefix: &str) -> Option<(String, Vec<String>)> {
    let body = content.strip_prefix(prefix)?;
    let mut tokens = body.trim().split(' ').filter(|token| !token.is_empty()).map(str::to_owned);

    let name = tokens.next()?.to_lowercase();
    Some((name, tokens.collect()))
}

#[cfg(test)]
mod tests {
    use super::parse_message;

    #[test]
    fn splits_on_repeated_spaces() {
        let (name, args) = parse_message("!Text   hello  world ", "!").unwrap();
        assert_eq!(name, "text");
        assert_eq!(args, ["hello", "world"]);
    }

    #[test]
    fn requires_prefix_and_name() {
        assert!(parse_message("text hello", "!").is_none());
        assert!(parse_message("!   ", "!").is_none());
        assert_eq!(parse_message("e!ping", "e!").map(|(name, _)| name).as_deref(), Some("ping"));
    }
}
