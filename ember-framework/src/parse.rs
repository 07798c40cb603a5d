use std::sync::LazyLock;

use regex::Regex;
use serenity::all::{ChannelId, GuildId, RoleId, UserId};

use ember_core::OptionKind;
use ember_core::entities::{EntityCache, Mentionable, ResolvedChannel, ResolvedMember, ResolvedRole, ResolvedUser};

use crate::invocation::SlashValue;

static USER_MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^<@!?(\d+)>$").expect("user mention pattern"));
static ROLE_MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^<@&(\d+)>$").expect("role mention pattern"));
static CHANNEL_MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^<#(\d+)>$").expect("channel mention pattern"));
static ANY_MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^<@[!&]?(\d+)>$").expect("mention pattern"));

/// Where mention lookups run.
#[derive(Clone, Copy)]
pub struct ParseScope<'a> {
    pub cache: &'a dyn EntityCache,
    pub guild_id: Option<GuildId>,
}

/// A type an option can be read as, from either surface.
pub trait OptionValue: Sized {
    const KIND: OptionKind;

    fn from_slash(value: &SlashValue, scope: ParseScope<'_>) -> Option<Self>;

    /// Parse a free-text token. A miss is `None`, never an error.
    fn parse(raw: &str, scope: ParseScope<'_>) -> Option<Self>;
}

fn snowflake(pattern: &Regex, raw: &str) -> Option<u64> {
    pattern
        .captures(raw)?
        .get(1)?
        .as_str()
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
}

pub fn parse_boolean(raw: &str) -> Option<bool> {
    match raw {
        "True" => Some(true),
        "False" => Some(false),
        _ => None,
    }
}

pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

pub fn parse_integer(raw: &str) -> Option<i64> {
    let value = parse_number(raw)?;
    if value.fract() != 0.0 || value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return None;
    }
    Some(value as i64)
}

pub fn parse_user_id(raw: &str) -> Option<UserId> {
    snowflake(&USER_MENTION, raw).map(UserId::new)
}

pub fn parse_role_id(raw: &str) -> Option<RoleId> {
    snowflake(&ROLE_MENTION, raw).map(RoleId::new)
}

pub fn parse_channel_id(raw: &str) -> Option<ChannelId> {
    snowflake(&CHANNEL_MENTION, raw).map(ChannelId::new)
}

impl OptionValue for String {
    const KIND: OptionKind = OptionKind::String;

    fn from_slash(value: &SlashValue, _scope: ParseScope<'_>) -> Option<Self> {
        match value {
            SlashValue::String(value) => Some(value.clone()),
            _ => None,
        }
    }

    fn parse(raw: &str, _scope: ParseScope<'_>) -> Option<Self> {
        Some(raw.to_owned())
    }
}

impl OptionValue for i64 {
    const KIND: OptionKind = OptionKind::Integer;

    fn from_slash(value: &SlashValue, _scope: ParseScope<'_>) -> Option<Self> {
        match value {
            SlashValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    fn parse(raw: &str, _scope: ParseScope<'_>) -> Option<Self> {
        parse_integer(raw)
    }
}

impl OptionValue for f64 {
    const KIND: OptionKind = OptionKind::Number;

    fn from_slash(value: &SlashValue, _scope: ParseScope<'_>) -> Option<Self> {
        match value {
            SlashValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    fn parse(raw: &str, _scope: ParseScope<'_>) -> Option<Self> {
        parse_number(raw)
    }
}

impl OptionValue for bool {
    const KIND: OptionKind = OptionKind::Boolean;

    fn from_slash(value: &SlashValue, _scope: ParseScope<'_>) -> Option<Self> {
        match value {
            SlashValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    fn parse(raw: &str, _scope: ParseScope<'_>) -> Option<Self> {
        parse_boolean(raw)
    }
}

impl OptionValue for ResolvedUser {
    const KIND: OptionKind = OptionKind::User;

    fn from_slash(value: &SlashValue, _scope: ParseScope<'_>) -> Option<Self> {
        match value {
            SlashValue::User(user, _) => Some(user.clone()),
            _ => None,
        }
    }

    fn parse(raw: &str, scope: ParseScope<'_>) -> Option<Self> {
        scope.cache.user(parse_user_id(raw)?)
    }
}

impl OptionValue for ResolvedMember {
    const KIND: OptionKind = OptionKind::Member;

    fn from_slash(value: &SlashValue, scope: ParseScope<'_>) -> Option<Self> {
        match value {
            SlashValue::User(_, Some(member)) => Some(member.clone()),
            SlashValue::User(user, None) => scope.cache.member(scope.guild_id?, user.id),
            _ => None,
        }
    }

    fn parse(raw: &str, scope: ParseScope<'_>) -> Option<Self> {
        scope.cache.member(scope.guild_id?, parse_user_id(raw)?)
    }
}

impl OptionValue for ResolvedRole {
    const KIND: OptionKind = OptionKind::Role;

    fn from_slash(value: &SlashValue, _scope: ParseScope<'_>) -> Option<Self> {
        match value {
            SlashValue::Role(role) => Some(role.clone()),
            _ => None,
        }
    }

    fn parse(raw: &str, scope: ParseScope<'_>) -> Option<Self> {
        scope.cache.role(scope.guild_id?, parse_role_id(raw)?)
    }
}

impl OptionValue for ResolvedChannel {
    const KIND: OptionKind = OptionKind::Channel;

    fn from_slash(value: &SlashValue, _scope: ParseScope<'_>) -> Option<Self> {
        match value {
            SlashValue::Channel(channel) => Some(channel.clone()),
            _ => None,
        }
    }

    fn parse(raw: &str, scope: ParseScope<'_>) -> Option<Self> {
        scope.cache.channel(parse_channel_id(raw)?)
    }
}

impl OptionValue for Mentionable {
    const KIND: OptionKind = OptionKind::Mentionable;

    fn from_slash(value: &SlashValue, _scope: ParseScope<'_>) -> Option<Self> {
        match value {
            SlashValue::User(_, Some(member)) => Some(Self::Member(member.clone())),
            SlashValue::User(user, None) => Some(Self::User(user.clone())),
            SlashValue::Role(role) => Some(Self::Role(role.clone())),
            _ => None,
        }
    }

    /// Member first, then user, then role.
    fn parse(raw: &str, scope: ParseScope<'_>) -> Option<Self> {
        let id = snowflake(&ANY_MENTION, raw)?;

        if let Some(guild_id) = scope.guild_id {
            if let Some(member) = scope.cache.member(guild_id, UserId::new(id)) {
                return Some(Self::Member(member));
            }
        }

        if let Some(user) = scope.cache.user(UserId::new(id)) {
            return Some(Self::User(user));
        }

        let guild_id = scope.guild_id?;
        scope.cache.role(guild_id, RoleId::new(id)).map(Self::Role)
    }
}
