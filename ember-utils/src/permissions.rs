use serenity::all::{GuildId, Http, Permissions, RoleId, UserId};

/// Convert a permission bitset into a sorted display list.
///
/// If `ADMINISTRATOR` is present, only `ADMINISTRATOR` is returned because
/// it implicitly grants all permissions.
pub fn permission_names(perms: Permissions) -> Vec<String> {
    if perms.contains(Permissions::ADMINISTRATOR) {
        return vec!["ADMINISTRATOR".to_owned()];
    }

    let mut names: Vec<String> = perms.iter_names().map(|(name, _flag)| name.to_owned()).collect();
    names.sort_unstable();
    names
}

/// Permissions from `required` that `granted` lacks.
///
/// A requirement that includes `ADMINISTRATOR` collapses to `ADMINISTRATOR`
/// alone, and holding `ADMINISTRATOR` satisfies everything.
pub fn missing_permissions(granted: Permissions, required: Permissions) -> Permissions {
    if granted.contains(Permissions::ADMINISTRATOR) {
        return Permissions::empty();
    }

    let required = if required.contains(Permissions::ADMINISTRATOR) {
        Permissions::ADMINISTRATOR
    } else {
        required
    };

    required - granted
}

/// Resolve a member's effective guild permissions from its roles.
pub async fn resolve_user_permissions(
    http: &Http,
    guild_id: GuildId,
    user_id: UserId,
) -> anyhow::Result<Permissions> {
    let guild = guild_id.to_partial_guild(http).await?;
    if guild.owner_id == user_id {
        return Ok(Permissions::all());
    }

    let member = guild_id.member(http, user_id).await?;
    let roles = guild_id.roles(http).await?;

    let mut resolved = Permissions::empty();
    let everyone_role_id = RoleId::new(guild_id.get());

    for role in roles.values() {
        if role.id == everyone_role_id || member.roles.contains(&role.id) {
            resolved |= role.permissions;
        }
    }

    tracing::debug!(%guild_id, %user_id, bits = resolved.bits(), "resolved member permissions");
    Ok(resolved)
}
