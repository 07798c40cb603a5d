mod events;
mod gateway;

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serenity::all::{Client, GatewayIntents};
use tracing::info;
use tracing_subscriber::filter::{EnvFilter, filter_fn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use rustls::crypto::ring::default_provider;

use ember_database::{ConfigStore, DATABASE_DIR, UserStore, env_bool, env_u64};
use ember_framework::Framework;

use crate::gateway::{Gateway, ShardManagerContainer};

const DEFAULT_CONFIG_WATCH_SECS: u64 = 5;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    dotenvy::dotenv().ok();

    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yml".to_owned());
    let config = Arc::new(ConfigStore::open(config_path)?);

    if env_bool("CONFIG_WATCH", true) {
        let watch_secs = env_u64("CONFIG_WATCH_SECS", DEFAULT_CONFIG_WATCH_SECS).max(1);
        Arc::clone(&config).watch(Duration::from_secs(watch_secs));
        info!(watch_secs, "config hot reload enabled");
    } else {
        info!("config hot reload disabled (set CONFIG_WATCH=true to enable)");
    }

    let database_dir = PathBuf::from(env::var("DATABASE_DIR").unwrap_or_else(|_| DATABASE_DIR.to_owned()));
    let users = Arc::new(UserStore::open(database_dir.join("users.yml"))?);

    let token = config.get().bot.token.clone();
    if token.trim().is_empty() {
        anyhow::bail!("no bot token configured (set DISCORD_TOKEN or bot.token)");
    }

    let framework = Framework::build(
        config,
        users,
        ember_commands::commands(),
        events::events(),
        ember_commands::languages()?,
    )?;

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    info!("Ember is connecting...");

    let mut client = Client::builder(&token, intents)
        .framework(Gateway::new(framework))
        .await?;

    client
        .data
        .write()
        .await
        .insert::<ShardManagerContainer>(Arc::clone(&client.shard_manager));

    client.start().await?;
    Ok(())
}

/// Serenity's shard bookkeeping is always muted. Without `RUST_LOG` output is
/// capped at INFO.
fn init_tracing() {
    let env_filter = env::var("RUST_LOG").ok().and_then(|_| EnvFilter::try_from_default_env().ok());
    let capped = env_filter.is_none();

    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(move |metadata| {
        if capped && *metadata.level() > tracing::Level::INFO {
            return false;
        }

        let target = metadata.target();
        !(target.starts_with("serenity::gateway::bridge::shard_manager")
            || target.starts_with("serenity::gateway::bridge::shard_runner"))
    }));

    tracing_subscriber::registry().with(env_filter).with(fmt_layer).init();
}
