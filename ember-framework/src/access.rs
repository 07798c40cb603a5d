use std::collections::BTreeSet;
use std::fmt;

use serenity::all::{GuildId, Permissions, UserId};

use ember_core::CommandSchema;
use ember_utils::permissions::{missing_permissions, permission_names};

use crate::invocation::Surface;

/// Facts about an invocation the access rules look at.
#[derive(Clone, Copy, Debug)]
pub struct AccessContext {
    pub surface: Surface,
    pub guild_id: Option<GuildId>,
    pub author: UserId,
    /// `None` outside guilds or when the bot member is unavailable.
    pub bot_permissions: Option<Permissions>,
    /// `None` outside guilds or when the invoking member is unavailable.
    pub member_permissions: Option<Permissions>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Denial {
    SurfaceMismatch,
    DirectMessagesDisabled,
    GuildsDisabled,
    GuildNotAllowed(GuildId),
    GuildExcluded(GuildId),
    DeveloperOnly,
    MissingBotPermissions(Permissions),
    MissingUserPermissions(Permissions),
}

impl Denial {
    /// Text sent back to the invoker. Only permission denials are announced.
    pub fn notice(&self) -> Option<String> {
        let (lead, missing) = match self {
            Self::MissingBotPermissions(missing) => ("Missing bot permissions.", missing),
            Self::MissingUserPermissions(missing) => ("Missing user permissions.", missing),
            _ => return None,
        };

        let names = permission_names(*missing);
        if names.is_empty() {
            return Some(lead.to_owned());
        }
        Some(format!("{lead} {}", names.join(", ")))
    }
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SurfaceMismatch => f.write_str("command is not available on this surface"),
            Self::DirectMessagesDisabled => f.write_str("command is disabled in direct messages"),
            Self::GuildsDisabled => f.write_str("command is disabled in guilds"),
            Self::GuildNotAllowed(guild) => write!(f, "guild {guild} is not in the allow list"),
            Self::GuildExcluded(guild) => write!(f, "guild {guild} is excluded"),
            Self::DeveloperOnly => f.write_str("command is developer only"),
            Self::MissingBotPermissions(missing) => write!(f, "bot lacks {}", permission_names(*missing).join(", ")),
            Self::MissingUserPermissions(missing) => {
                write!(f, "member lacks {}", permission_names(*missing).join(", "))
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied(Denial),
}

impl Access {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Evaluate the static access rules of `command`, stopping at the first
/// failing rule.
pub fn evaluate(command: &CommandSchema, ctx: &AccessContext, developers: &BTreeSet<UserId>) -> Access {
    match check(command, ctx, developers) {
        Ok(()) => Access::Granted,
        Err(denial) => Access::Denied(denial),
    }
}

pub fn is_executable(command: &CommandSchema, ctx: &AccessContext, developers: &BTreeSet<UserId>) -> bool {
    evaluate(command, ctx, developers).is_granted()
}

fn check(command: &CommandSchema, ctx: &AccessContext, developers: &BTreeSet<UserId>) -> Result<(), Denial> {
    let rules = &command.access;

    let surface_matches = match ctx.surface {
        Surface::Slash => command.kind.has_slash_surface(),
        Surface::Message => command.kind.has_message_surface(),
    };
    if !surface_matches {
        return Err(Denial::SurfaceMismatch);
    }

    match ctx.guild_id {
        None if !rules.dm_access => return Err(Denial::DirectMessagesDisabled),
        Some(_) if !rules.guild_access => return Err(Denial::GuildsDisabled),
        _ => {}
    }

    if let Some(guild_id) = ctx.guild_id {
        if !rules.allowed_guilds.is_empty() && !rules.allowed_guilds.contains(&guild_id) {
            return Err(Denial::GuildNotAllowed(guild_id));
        }
        if rules.excluded_guilds.contains(&guild_id) {
            return Err(Denial::GuildExcluded(guild_id));
        }
    }

    if rules.developer_only && !developers.contains(&ctx.author) {
        return Err(Denial::DeveloperOnly);
    }

    if ctx.guild_id.is_none() {
        return Ok(());
    }

    if let Some(granted) = ctx.bot_permissions.filter(|_| !rules.bot_permissions.is_empty()) {
        let missing = missing_permissions(granted, rules.bot_permissions);
        if !missing.is_empty() {
            return Err(Denial::MissingBotPermissions(missing));
        }
    }

    if let Some(granted) = ctx.member_permissions.filter(|_| !rules.user_permissions.is_empty()) {
        let missing = missing_permissions(granted, rules.user_permissions);
        if !missing.is_empty() {
            return Err(Denial::MissingUserPermissions(missing));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Access, AccessContext, Denial, evaluate, is_executable};
    use crate::invocation::Surface;
    use ember_core::{CommandKind, CommandSchema};
    use serenity::all::{GuildId, Permissions, UserId};
    use std::collections::BTreeSet;

    fn guild_ctx(guild: u64) -> AccessContext {
        AccessContext {
            surface: Surface::Slash,
            guild_id: Some(GuildId::new(guild)),
            author: UserId::new(100),
            bot_permissions: Some(Permissions::all()),
            member_permissions: Some(Permissions::all()),
        }
    }

    fn dm_ctx() -> AccessContext {
        AccessContext {
            guild_id: None,
            bot_permissions: None,
            member_permissions: None,
            ..guild_ctx(1)
        }
    }

    fn no_developers() -> BTreeSet<UserId> {
        BTreeSet::new()
    }

    #[test]
    fn surface_mismatch_is_rejected_first() {
        let command = CommandSchema::new(CommandKind::MessageOnly, "legacy").dm_access(true);
        assert_eq!(
            evaluate(&command, &guild_ctx(1), &no_developers()),
            Access::Denied(Denial::SurfaceMismatch)
        );

        let command = CommandSchema::new(CommandKind::SlashOnly, "modern");
        let ctx = AccessContext {
            surface: Surface::Message,
            ..guild_ctx(1)
        };
        assert!(!is_executable(&command, &ctx, &no_developers()));
    }

    #[test]
    fn dm_and_guild_gating() {
        let command = CommandSchema::new(CommandKind::Combined, "ping");
        assert_eq!(
            evaluate(&command, &dm_ctx(), &no_developers()),
            Access::Denied(Denial::DirectMessagesDisabled)
        );
        assert!(is_executable(&command.clone().dm_access(true), &dm_ctx(), &no_developers()));

        let guildless = command.guild_access(false);
        assert_eq!(
            evaluate(&guildless, &guild_ctx(1), &no_developers()),
            Access::Denied(Denial::GuildsDisabled)
        );
    }

    #[test]
    fn allow_list_excluding_guild_always_denies() {
        let command = CommandSchema::new(CommandKind::Combined, "beta")
            .allowed_guilds([GuildId::new(2)])
            .dm_access(true);
        let developers = BTreeSet::from([UserId::new(100)]);

        assert_eq!(
            evaluate(&command, &guild_ctx(1), &developers),
            Access::Denied(Denial::GuildNotAllowed(GuildId::new(1)))
        );
        assert!(is_executable(&command, &guild_ctx(2), &developers));
        assert!(is_executable(&command, &dm_ctx(), &developers));
    }

    #[test]
    fn deny_list_rejects_listed_guild() {
        let command = CommandSchema::new(CommandKind::Combined, "fun").excluded_guilds([GuildId::new(3)]);
        assert_eq!(
            evaluate(&command, &guild_ctx(3), &no_developers()),
            Access::Denied(Denial::GuildExcluded(GuildId::new(3)))
        );
        assert!(is_executable(&command, &guild_ctx(4), &no_developers()));
    }

    #[test]
    fn developer_only_requires_listed_author() {
        let command = CommandSchema::new(CommandKind::Combined, "eval").developer_only(true);
        assert_eq!(
            evaluate(&command, &guild_ctx(1), &no_developers()),
            Access::Denied(Denial::DeveloperOnly)
        );
        assert!(is_executable(&command, &guild_ctx(1), &BTreeSet::from([UserId::new(100)])));
    }

    #[test]
    fn administrator_shortcut_checks_only_administrator() {
        let required = Permissions::ADMINISTRATOR | Permissions::BAN_MEMBERS | Permissions::KICK_MEMBERS;
        let command = CommandSchema::new(CommandKind::Combined, "nuke").bot_permissions(required);

        let holder = AccessContext {
            bot_permissions: Some(Permissions::ADMINISTRATOR),
            ..guild_ctx(1)
        };
        assert!(is_executable(&command, &holder, &no_developers()));

        let lacking = AccessContext {
            bot_permissions: Some(Permissions::BAN_MEMBERS | Permissions::KICK_MEMBERS),
            ..guild_ctx(1)
        };
        assert_eq!(
            evaluate(&command, &lacking, &no_developers()),
            Access::Denied(Denial::MissingBotPermissions(Permissions::ADMINISTRATOR))
        );
    }

    #[test]
    fn user_permissions_are_checked_after_bot_permissions() {
        let command = CommandSchema::new(CommandKind::Combined, "ban")
            .bot_permissions(Permissions::BAN_MEMBERS)
            .user_permissions(Permissions::BAN_MEMBERS);

        let ctx = AccessContext {
            member_permissions: Some(Permissions::SEND_MESSAGES),
            ..guild_ctx(1)
        };
        let denial = match evaluate(&command, &ctx, &no_developers()) {
            Access::Denied(denial) => denial,
            Access::Granted => panic!("member without BAN_MEMBERS was granted"),
        };
        assert_eq!(denial, Denial::MissingUserPermissions(Permissions::BAN_MEMBERS));
        assert_eq!(denial.notice().as_deref(), Some("Missing user permissions. BAN_MEMBERS"));
    }

    #[test]
    fn unknown_permission_sets_skip_checks() {
        let command = CommandSchema::new(CommandKind::Combined, "ban").user_permissions(Permissions::BAN_MEMBERS);
        let ctx = AccessContext {
            member_permissions: None,
            ..guild_ctx(1)
        };
        assert!(is_executable(&command, &ctx, &no_developers()));
    }

    #[test]
    fn only_permission_denials_have_notices() {
        assert_eq!(Denial::DeveloperOnly.notice(), None);
        assert_eq!(
            Denial::MissingBotPermissions(Permissions::ADMINISTRATOR).notice().as_deref(),
            Some("Missing bot permissions. ADMINISTRATOR")
        );
    }
}
