use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serenity::all::{
    Cache, ChannelId, CommandInteraction, Context, CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, CreateMessage, FullEvent, GuildChannel, GuildId, Member, Message,
    Permissions, ResolvedOption, ResolvedValue, Role, RoleId, ShardManager, User, UserId,
};
use serenity::framework::Framework as GatewayFramework;
use serenity::prelude::TypeMapKey;

use ember_core::Error;
use ember_core::entities::{EntityCache, ResolvedChannel, ResolvedMember, ResolvedRole, ResolvedUser};
use ember_framework::{Arguments, Framework, Invocation, Replied, Reply, SlashArguments, SlashValue, Transport};
use ember_utils::permissions::resolve_user_permissions;

pub struct ShardManagerContainer;

impl TypeMapKey for ShardManagerContainer {
    type Value = Arc<ShardManager>;
}

/// Feeds every gateway event into the framework's event registry.
pub struct Gateway {
    framework: Arc<Framework>,
}

impl Gateway {
    pub fn new(framework: Framework) -> Self {
        Self {
            framework: Arc::new(framework),
        }
    }
}

#[async_trait]
impl GatewayFramework for Gateway {
    async fn dispatch(&self, ctx: Context, event: FullEvent) {
        self.framework.dispatch_event(&ctx, &event).await;
    }
}

/// Heartbeat latency of the shard that received the event.
pub async fn shard_latency(ctx: &Context) -> Option<Duration> {
    let manager = ctx.data.read().await.get::<ShardManagerContainer>().cloned()?;
    let runners = manager.runners.lock().await;
    runners.get(&ctx.shard_id).and_then(|runner| runner.latency)
}

pub fn resolved_user(user: &User) -> ResolvedUser {
    ResolvedUser {
        id: user.id,
        name: user.name.clone(),
        global_name: user.global_name.clone(),
        bot: user.bot,
    }
}

fn resolved_member(member: &Member) -> ResolvedMember {
    ResolvedMember {
        guild_id: member.guild_id,
        user: resolved_user(&member.user),
        nick: member.nick.clone(),
        roles: member.roles.clone(),
        permissions: member.permissions,
    }
}

fn resolved_role(role: &Role) -> ResolvedRole {
    ResolvedRole {
        id: role.id,
        guild_id: role.guild_id,
        name: role.name.clone(),
        permissions: role.permissions,
    }
}

fn resolved_channel(channel: &GuildChannel) -> ResolvedChannel {
    ResolvedChannel {
        id: channel.id,
        guild_id: Some(channel.guild_id),
        name: Some(channel.name.clone()),
    }
}

/// Entity lookups against serenity's in-memory cache.
pub struct SerenityCache {
    cache: Arc<Cache>,
}

impl SerenityCache {
    pub fn new(cache: Arc<Cache>) -> Self {
        Self { cache }
    }
}

impl EntityCache for SerenityCache {
    fn user(&self, id: UserId) -> Option<ResolvedUser> {
        self.cache.user(id).map(|user| resolved_user(&user))
    }

    fn member(&self, guild_id: GuildId, id: UserId) -> Option<ResolvedMember> {
        self.cache.member(guild_id, id).map(|member| resolved_member(&member))
    }

    fn role(&self, guild_id: GuildId, id: RoleId) -> Option<ResolvedRole> {
        self.cache.role(guild_id, id).map(|role| resolved_role(&role))
    }

    fn channel(&self, id: ChannelId) -> Option<ResolvedChannel> {
        self.cache.channel(id).map(|channel| resolved_channel(&channel))
    }
}

pub async fn interaction_invocation(ctx: &Context, interaction: &CommandInteraction) -> Invocation {
    Invocation {
        command_name: interaction.data.name.clone(),
        arguments: Arguments::Slash(slash_arguments(interaction)),
        guild_id: interaction.guild_id,
        channel_id: interaction.channel_id,
        author: resolved_user(&interaction.user),
        locale: Some(interaction.locale.clone()),
        latency: shard_latency(ctx).await,
    }
}

pub async fn message_invocation(
    ctx: &Context,
    message: &Message,
    command_name: String,
    tokens: Vec<String>,
) -> Invocation {
    Invocation {
        command_name,
        arguments: Arguments::Message(tokens),
        guild_id: message.guild_id,
        channel_id: message.channel_id,
        author: resolved_user(&message.author),
        locale: None,
        latency: shard_latency(ctx).await,
    }
}

fn slash_arguments(interaction: &CommandInteraction) -> SlashArguments {
    let mut arguments = SlashArguments::default();
    collect_options(&interaction.data.options(), interaction.guild_id, &mut arguments);
    arguments
}

fn collect_options(options: &[ResolvedOption<'_>], guild_id: Option<GuildId>, arguments: &mut SlashArguments) {
    for option in options {
        match &option.value {
            ResolvedValue::SubCommandGroup(children) => {
                arguments.group = Some(option.name.to_owned());
                collect_options(children, guild_id, arguments);
            }
            ResolvedValue::SubCommand(children) => {
                arguments.subcommand = Some(option.name.to_owned());
                collect_options(children, guild_id, arguments);
            }
            value => {
                if let Some(value) = slash_value(value, guild_id) {
                    arguments.values.push((option.name.to_owned(), value));
                }
            }
        }
    }
}

fn slash_value(value: &ResolvedValue<'_>, guild_id: Option<GuildId>) -> Option<SlashValue> {
    let value = match value {
        ResolvedValue::String(value) => SlashValue::String((*value).to_owned()),
        ResolvedValue::Integer(value) => SlashValue::Integer(*value),
        ResolvedValue::Number(value) => SlashValue::Number(*value),
        ResolvedValue::Boolean(value) => SlashValue::Boolean(*value),
        ResolvedValue::User(user, member) => {
            let user = resolved_user(user);
            let member = guild_id.zip(*member).map(|(guild_id, member)| ResolvedMember {
                guild_id,
                user: user.clone(),
                nick: member.nick.clone(),
                roles: member.roles.clone(),
                permissions: member.permissions,
            });
            SlashValue::User(user, member)
        }
        ResolvedValue::Role(role) => SlashValue::Role(resolved_role(role)),
        ResolvedValue::Channel(channel) => SlashValue::Channel(ResolvedChannel {
            id: channel.id,
            guild_id,
            name: channel.name.clone(),
        }),
        _ => return None,
    };
    Some(value)
}

/// Replies to a structured interaction. The first reply answers the
/// interaction, later ones are sent as follow-ups.
pub struct InteractionTransport<'a> {
    ctx: &'a Context,
    interaction: &'a CommandInteraction,
    cache: SerenityCache,
    responded: AtomicBool,
}

impl<'a> InteractionTransport<'a> {
    pub fn new(ctx: &'a Context, interaction: &'a CommandInteraction) -> Self {
        Self {
            ctx,
            interaction,
            cache: SerenityCache::new(Arc::clone(&ctx.cache)),
            responded: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Transport for InteractionTransport<'_> {
    fn entities(&self) -> &dyn EntityCache {
        &self.cache
    }

    async fn reply(&self, reply: Reply) -> Result<Replied, Error> {
        if self.responded.swap(true, Ordering::AcqRel) {
            let mut followup = CreateInteractionResponseFollowup::new()
                .embeds(reply.embeds)
                .ephemeral(reply.ephemeral);
            if let Some(content) = reply.content {
                followup = followup.content(content);
            }
            self.interaction.create_followup(&self.ctx.http, followup).await?;
        } else {
            let mut message = CreateInteractionResponseMessage::new()
                .embeds(reply.embeds)
                .ephemeral(reply.ephemeral);
            if let Some(content) = reply.content {
                message = message.content(content);
            }
            self.interaction
                .create_response(&self.ctx.http, CreateInteractionResponse::Message(message))
                .await?;
        }
        Ok(Replied::Interaction)
    }

    async fn bot_permissions(&self) -> Result<Option<Permissions>, Error> {
        Ok(self.interaction.app_permissions)
    }

    async fn member_permissions(&self) -> Result<Option<Permissions>, Error> {
        Ok(self.interaction.member.as_ref().and_then(|member| member.permissions))
    }
}

/// Replies to a prefixed message by referencing it.
pub struct MessageTransport<'a> {
    ctx: &'a Context,
    message: &'a Message,
    cache: SerenityCache,
}

impl<'a> MessageTransport<'a> {
    pub fn new(ctx: &'a Context, message: &'a Message) -> Self {
        Self {
            ctx,
            message,
            cache: SerenityCache::new(Arc::clone(&ctx.cache)),
        }
    }

    async fn permissions_of(&self, user_id: UserId) -> Result<Option<Permissions>, Error> {
        let Some(guild_id) = self.message.guild_id else {
            return Ok(None);
        };
        resolve_user_permissions(&self.ctx.http, guild_id, user_id).await.map(Some)
    }
}

#[async_trait]
impl Transport for MessageTransport<'_> {
    fn entities(&self) -> &dyn EntityCache {
        &self.cache
    }

    async fn reply(&self, reply: Reply) -> Result<Replied, Error> {
        let mut builder = CreateMessage::new().embeds(reply.embeds).reference_message(self.message);
        if let Some(content) = reply.content {
            builder = builder.content(content);
        }
        let sent = self.message.channel_id.send_message(&self.ctx.http, builder).await?;
        Ok(Replied::Message(sent.id))
    }

    async fn bot_permissions(&self) -> Result<Option<Permissions>, Error> {
        let bot_id = self.ctx.cache.current_user().id;
        self.permissions_of(bot_id).await
    }

    async fn member_permissions(&self) -> Result<Option<Permissions>, Error> {
        self.permissions_of(self.message.author.id).await
    }
}
