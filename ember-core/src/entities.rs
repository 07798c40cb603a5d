use serenity::all::{ChannelId, GuildId, Permissions, RoleId, UserId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedUser {
    pub id: UserId,
    pub name: String,
    pub global_name: Option<String>,
    pub bot: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedMember {
    pub guild_id: GuildId,
    pub user: ResolvedUser,
    pub nick: Option<String>,
    pub roles: Vec<RoleId>,
    pub permissions: Option<Permissions>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRole {
    pub id: RoleId,
    pub guild_id: GuildId,
    pub name: String,
    pub permissions: Permissions,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedChannel {
    pub id: ChannelId,
    pub guild_id: Option<GuildId>,
    pub name: Option<String>,
}

/// Result of a mentionable option: whichever store matched first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mentionable {
    Member(ResolvedMember),
    User(ResolvedUser),
    Role(ResolvedRole),
}

/// Synchronous ID-keyed lookups against the gateway client's caches.
pub trait EntityCache: Send + Sync {
    fn user(&self, id: UserId) -> Option<ResolvedUser>;
    fn member(&self, guild_id: GuildId, id: UserId) -> Option<ResolvedMember>;
    fn role(&self, guild_id: GuildId, id: RoleId) -> Option<ResolvedRole>;
    fn channel(&self, id: ChannelId) -> Option<ResolvedChannel>;
}
