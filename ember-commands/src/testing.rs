use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serenity::all::{ChannelId, GuildId, MessageId, Permissions, RoleId, UserId};
use tempfile::TempDir;

use ember_core::Error;
use ember_core::entities::{EntityCache, ResolvedChannel, ResolvedMember, ResolvedRole, ResolvedUser};
use ember_database::{ConfigStore, UserStore};
use ember_framework::{Arguments, Dispatch, Framework, Invocation, Replied, Reply, Transport};

const CONFIG: &str = r#"
bot:
  defaultLanguage: en-US
commands:
  defaultPrefix: "!"
"#;

pub(crate) const AUTHOR: u64 = 100;

struct NoEntities;

impl EntityCache for NoEntities {
    fn user(&self, _id: UserId) -> Option<ResolvedUser> {
        None
    }

    fn member(&self, _guild_id: GuildId, _id: UserId) -> Option<ResolvedMember> {
        None
    }

    fn role(&self, _guild_id: GuildId, _id: RoleId) -> Option<ResolvedRole> {
        None
    }

    fn channel(&self, _id: ChannelId) -> Option<ResolvedChannel> {
        None
    }
}

#[derive(Default)]
struct Recorder {
    replies: Mutex<Vec<Reply>>,
}

#[async_trait]
impl Transport for Recorder {
    fn entities(&self) -> &dyn EntityCache {
        &NoEntities
    }

    async fn reply(&self, reply: Reply) -> Result<Replied, Error> {
        self.replies.lock().unwrap().push(reply);
        Ok(Replied::Message(MessageId::new(1)))
    }

    async fn bot_permissions(&self) -> Result<Option<Permissions>, Error> {
        Ok(Some(Permissions::all()))
    }

    async fn member_permissions(&self) -> Result<Option<Permissions>, Error> {
        Ok(Some(Permissions::all()))
    }
}

/// A framework over the bundled commands and languages, backed by temp files.
pub(crate) struct Harness {
    _dir: TempDir,
    pub framework: Framework,
}

impl Harness {
    pub(crate) fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        std::fs::write(&config_path, CONFIG).unwrap();

        let config = Arc::new(ConfigStore::open(config_path).unwrap());
        let users = Arc::new(UserStore::open(dir.path().join("users.yml")).unwrap());
        let framework =
            Framework::build(config, users, crate::commands(), Vec::new(), crate::languages().unwrap()).unwrap();

        Self { _dir: dir, framework }
    }

    /// Run a prefixed message such as `"!text hello"` and collect the replies.
    pub(crate) async fn message(&self, content: &str) -> (Dispatch, Vec<Reply>) {
        let (command_name, tokens) = self.framework.parse_message(content).unwrap();
        let invocation = Invocation {
            command_name,
            arguments: Arguments::Message(tokens),
            guild_id: Some(GuildId::new(1)),
            channel_id: ChannelId::new(2),
            author: ResolvedUser {
                id: UserId::new(AUTHOR),
                name: "author".to_owned(),
                global_name: None,
                bot: false,
            },
            locale: None,
            latency: Some(Duration::from_millis(42)),
        };
        self.run(&invocation).await
    }

    pub(crate) async fn run(&self, invocation: &Invocation) -> (Dispatch, Vec<Reply>) {
        let transport = Recorder::default();
        let outcome = self.framework.execute(invocation, &transport).await.unwrap();
        let replies = transport.replies.lock().unwrap().clone();
        (outcome, replies)
    }
}

/// Description of the first embed of `reply`.
pub(crate) fn description(reply: &Reply) -> String {
    let embed = serde_json::to_value(&reply.embeds[0]).unwrap();
    embed["description"].as_str().unwrap_or_default().to_owned()
}
