use async_trait::async_trait;
use serenity::all::{CreateEmbed, MessageId, Permissions};

use ember_core::Error;
use ember_core::entities::EntityCache;

#[derive(Clone, Debug, Default)]
pub struct Reply {
    pub content: Option<String>,
    pub embeds: Vec<CreateEmbed>,
    /// Only honored by structured interactions.
    pub ephemeral: bool,
}

impl Reply {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn embed(mut self, embed: CreateEmbed) -> Self {
        self.embeds.push(embed);
        self
    }

    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }
}

impl From<&str> for Reply {
    fn from(content: &str) -> Self {
        Self::new().content(content)
    }
}

impl From<String> for Reply {
    fn from(content: String) -> Self {
        Self::new().content(content)
    }
}

impl From<CreateEmbed> for Reply {
    fn from(embed: CreateEmbed) -> Self {
        Self::new().embed(embed)
    }
}

/// What a reply produced, matching the surface it was sent on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Replied {
    Interaction,
    Message(MessageId),
}

/// The gateway side of one invocation.
#[async_trait]
pub trait Transport: Send + Sync {
    fn entities(&self) -> &dyn EntityCache;

    async fn reply(&self, reply: Reply) -> Result<Replied, Error>;

    /// The bot's effective permissions in the invoking guild, if known.
    async fn bot_permissions(&self) -> Result<Option<Permissions>, Error>;

    /// The invoking member's effective permissions, if known.
    async fn member_permissions(&self) -> Result<Option<Permissions>, Error>;
}
