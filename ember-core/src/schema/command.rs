use std::collections::BTreeSet;

use serenity::all::{GuildId, Permissions};

use super::option::OptionNode;

/// Invocation surfaces a command answers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Structured interactions only.
    SlashOnly,
    /// Prefixed free-text messages only.
    MessageOnly,
    /// Both surfaces through one handler.
    Combined,
}

impl CommandKind {
    pub fn has_slash_surface(self) -> bool {
        matches!(self, Self::SlashOnly | Self::Combined)
    }

    pub fn has_message_surface(self) -> bool {
        matches!(self, Self::MessageOnly | Self::Combined)
    }
}

/// Static access rules evaluated before a handler may run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessRules {
    pub allowed_guilds: BTreeSet<GuildId>,
    pub excluded_guilds: BTreeSet<GuildId>,
    pub dm_access: bool,
    pub guild_access: bool,
    pub developer_only: bool,
    pub user_permissions: Permissions,
    pub bot_permissions: Permissions,
    /// Declared cooldown in seconds. Tracking belongs to the transport layer.
    pub cooldown_secs: u64,
}

impl Default for AccessRules {
    fn default() -> Self {
        Self {
            allowed_guilds: BTreeSet::new(),
            excluded_guilds: BTreeSet::new(),
            dm_access: false,
            guild_access: true,
            developer_only: false,
            user_permissions: Permissions::empty(),
            bot_permissions: Permissions::empty(),
            cooldown_secs: 0,
        }
    }
}

impl AccessRules {
    /// Allow and deny lists are mutually exclusive.
    pub fn has_conflicting_guild_lists(&self) -> bool {
        !self.allowed_guilds.is_empty() && !self.excluded_guilds.is_empty()
    }
}

/// Declarative description of a command, independent of any locale.
#[derive(Clone, Debug, PartialEq)]
pub struct CommandSchema {
    pub key: String,
    pub kind: CommandKind,
    pub nodes: Vec<OptionNode>,
    pub access: AccessRules,
    pub aliases: Vec<String>,
    pub enabled: bool,
}

impl CommandSchema {
    pub fn new(kind: CommandKind, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind,
            nodes: Vec::new(),
            access: AccessRules::default(),
            aliases: Vec::new(),
            enabled: true,
        }
    }

    pub fn option(mut self, node: impl Into<OptionNode>) -> Self {
        self.nodes.push(node.into());
        self
    }

    pub fn subcommand(mut self, key: impl Into<String>, options: impl IntoIterator<Item = OptionNode>) -> Self {
        self.nodes.push(OptionNode::subcommand(key, options));
        self
    }

    pub fn group(mut self, key: impl Into<String>, subcommands: impl IntoIterator<Item = OptionNode>) -> Self {
        self.nodes.push(OptionNode::group(key, subcommands));
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn allowed_guilds(mut self, guilds: impl IntoIterator<Item = GuildId>) -> Self {
        self.access.allowed_guilds.extend(guilds);
        self
    }

    pub fn excluded_guilds(mut self, guilds: impl IntoIterator<Item = GuildId>) -> Self {
        self.access.excluded_guilds.extend(guilds);
        self
    }

    pub fn dm_access(mut self, allowed: bool) -> Self {
        self.access.dm_access = allowed;
        self
    }

    pub fn guild_access(mut self, allowed: bool) -> Self {
        self.access.guild_access = allowed;
        self
    }

    pub fn developer_only(mut self, developer_only: bool) -> Self {
        self.access.developer_only = developer_only;
        self
    }

    pub fn user_permissions(mut self, permissions: Permissions) -> Self {
        self.access.user_permissions = permissions;
        self
    }

    pub fn bot_permissions(mut self, permissions: Permissions) -> Self {
        self.access.bot_permissions = permissions;
        self
    }

    pub fn cooldown_secs(mut self, seconds: u64) -> Self {
        self.access.cooldown_secs = seconds;
        self
    }

    pub fn disable(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn enable(mut self) -> Self {
        self.enabled = true;
        self
    }
}
