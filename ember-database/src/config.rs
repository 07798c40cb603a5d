use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime};

use arc_swap::ArcSwap;
use serde::Deserialize;
use serenity::all::UserId;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::error::StoreError;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub bot: BotConfig,
    pub commands: CommandsConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    #[serde(default)]
    pub token: String,
    pub default_language: String,
    /// Snowflakes of the users allowed to run developer-only commands.
    #[serde(default)]
    pub developers: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandsConfig {
    pub default_prefix: String,
}

impl Config {
    /// Parse and validate. `DISCORD_TOKEN`, when set, replaces `bot.token`.
    pub fn from_yaml(path: &Path, raw: &str) -> Result<Self, StoreError> {
        let mut config: Config = serde_yaml::from_str(raw).map_err(|source| StoreError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;

        if let Ok(token) = env::var("DISCORD_TOKEN") {
            if !token.trim().is_empty() {
                config.bot.token = token;
            }
        }

        config.validate(path)?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        Self::from_yaml(path, &raw)
    }

    pub fn developer_ids(&self) -> BTreeSet<UserId> {
        self.bot
            .developers
            .iter()
            .filter_map(|id| id.trim().parse::<u64>().ok())
            .filter(|id| *id != 0)
            .map(UserId::new)
            .collect()
    }

    fn validate(&self, path: &Path) -> Result<(), StoreError> {
        let invalid = |message: String| StoreError::InvalidConfig {
            path: path.to_path_buf(),
            message,
        };

        if self.bot.default_language.trim().is_empty() {
            return Err(invalid("bot.defaultLanguage must not be empty".to_owned()));
        }

        if self.commands.default_prefix.is_empty() {
            return Err(invalid("commands.defaultPrefix must not be empty".to_owned()));
        }

        if let Some(id) = self
            .bot
            .developers
            .iter()
            .find(|id| !matches!(id.trim().parse::<u64>(), Ok(value) if value != 0))
        {
            return Err(invalid(format!("developer id `{id}` is not a snowflake")));
        }

        Ok(())
    }
}

/// Live configuration. Readers always see a complete, validated snapshot.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    current: ArcSwap<Config>,
    modified: Mutex<Option<SystemTime>>,
}

impl ConfigStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let config = Config::load(&path)?;
        info!(path = %path.display(), "config loaded");

        Ok(Self {
            modified: Mutex::new(modified_at(&path)),
            current: ArcSwap::from_pointee(config),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> Arc<Config> {
        self.current.load_full()
    }

    /// Re-read the file. On failure the previous config stays active.
    pub fn reload(&self) -> Result<Arc<Config>, StoreError> {
        match Config::load(&self.path) {
            Ok(config) => {
                let config = Arc::new(config);
                self.current.store(Arc::clone(&config));
                info!(path = %self.path.display(), "config reloaded");
                Ok(config)
            }
            Err(err) => {
                error!(path = %self.path.display(), %err, "config reload failed; keeping previous config");
                Err(err)
            }
        }
    }

    /// Reload whenever the file's modification time changes.
    pub fn watch(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if self.poll_changed() {
                    debug!(path = %self.path.display(), "config file changed");
                    self.reload().ok();
                }
            }
        })
    }

    fn poll_changed(&self) -> bool {
        let modified = modified_at(&self.path);
        let mut last = self.modified.lock().unwrap_or_else(PoisonError::into_inner);
        if modified.is_some() && *last != modified {
            *last = modified;
            return true;
        }
        false
    }
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|meta| meta.modified()).ok()
}

pub fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

pub fn env_u64(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(value) => value.trim().parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigStore};
    use crate::error::StoreError;
    use serenity::all::UserId;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::{Duration, SystemTime};

    const VALID: &str = r#"
bot:
  token: from-file
  defaultLanguage: en-US
  developers: ["1234"]
commands:
  defaultPrefix: "!"
"#;

    #[test]
    fn parses_camel_case_config() {
        let config = Config::from_yaml(Path::new("config.yml"), VALID).unwrap();
        assert_eq!(config.bot.default_language, "en-US");
        assert_eq!(config.commands.default_prefix, "!");
        assert!(config.developer_ids().contains(&UserId::new(1234)));
    }

    #[test]
    fn rejects_non_numeric_developer() {
        let raw = VALID.replace("\"1234\"", "\"someone\"");
        let err = Config::from_yaml(Path::new("config.yml"), &raw).unwrap_err();
        assert!(matches!(err, StoreError::InvalidConfig { message, .. } if message.contains("someone")));
    }

    #[test]
    fn rejects_empty_prefix() {
        let raw = VALID.replace("\"!\"", "\"\"");
        assert!(matches!(
            Config::from_yaml(Path::new("config.yml"), &raw),
            Err(StoreError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn failed_reload_keeps_previous_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, VALID).unwrap();

        let store = ConfigStore::open(&path).unwrap();
        std::fs::write(&path, "bot: [not, a, map]").unwrap();
        assert!(store.reload().is_err());
        assert_eq!(store.get().commands.default_prefix, "!");

        std::fs::write(&path, VALID.replace("\"!\"", "\"?\"")).unwrap();
        assert_eq!(store.reload().unwrap().commands.default_prefix, "?");
        assert_eq!(store.get().commands.default_prefix, "?");
    }

    fn touch(path: &Path, content: &str, offset: u64) {
        std::fs::write(path, content).unwrap();
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(offset)).unwrap();
    }

    #[tokio::test]
    async fn watcher_survives_a_broken_edit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, VALID).unwrap();

        let store = Arc::new(ConfigStore::open(&path).unwrap());
        let watcher = Arc::clone(&store).watch(Duration::from_millis(10));

        touch(&path, "bot: [not, a, map]", 60);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(store.get().commands.default_prefix, "!");
        assert!(!watcher.is_finished());

        touch(&path, &VALID.replace("\"!\"", "\"?\""), 120);
        for _ in 0..200 {
            if store.get().commands.default_prefix == "?" {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(store.get().commands.default_prefix, "?");
        watcher.abort();
    }
}
