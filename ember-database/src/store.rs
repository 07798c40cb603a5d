use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::StoreError;

/// On-disk encoding of a file store, picked from the file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreFormat {
    Json,
    Yaml,
}

impl StoreFormat {
    pub fn from_path(path: &Path) -> Result<Self, StoreError> {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yml" | "yaml") => Ok(Self::Yaml),
            _ => Err(StoreError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    fn decode<T: DeserializeOwned>(self, path: &Path, raw: &str) -> Result<T, StoreError> {
        match self {
            Self::Json => serde_json::from_str(raw).map_err(|source| StoreError::Json {
                path: path.to_path_buf(),
                source,
            }),
            Self::Yaml => serde_yaml::from_str(raw).map_err(|source| StoreError::Yaml {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn encode(self, path: &Path, value: &Value) -> Result<String, StoreError> {
        match self {
            Self::Json => serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
                path: path.to_path_buf(),
                source,
            }),
            Self::Yaml => serde_yaml::to_string(value).map_err(|source| StoreError::Yaml {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// String-keyed records kept in memory and written back whole after every
/// mutation.
#[derive(Debug)]
pub struct FileStore<V> {
    path: PathBuf,
    format: StoreFormat,
    data: Mutex<BTreeMap<String, V>>,
}

impl<V> FileStore<V>
where
    V: Clone + Serialize + DeserializeOwned,
{
    /// Load `path`, creating an empty store (and its folder) when missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let format = StoreFormat::from_path(&path)?;

        let data = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                format.decode(&path, &raw)?
            }
        } else {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
            let data = BTreeMap::new();
            write(&path, format, &data)?;
            info!(path = %path.display(), "created empty file store");
            data
        };

        debug!(path = %path.display(), entries = data.len(), "file store loaded");

        Ok(Self {
            path,
            format,
            data: Mutex::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn all(&self) -> BTreeMap<String, V> {
        self.lock().clone()
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.lock().get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: V) -> Result<(), StoreError> {
        self.update(key, |_| value).map(|_| ())
    }

    /// Replace the record under `key` with whatever `setter` derives from the
    /// current one.
    pub fn update(&self, key: impl Into<String>, setter: impl FnOnce(Option<V>) -> V) -> Result<V, StoreError> {
        let mut data = self.lock();
        let key = key.into();
        let value = setter(data.get(&key).cloned());
        data.insert(key, value.clone());
        write(&self.path, self.format, &data)?;
        Ok(value)
    }

    pub fn remove(&self, key: &str) -> Result<Option<V>, StoreError> {
        let mut data = self.lock();
        let removed = data.remove(key);
        if removed.is_some() {
            write(&self.path, self.format, &data)?;
        }
        Ok(removed)
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, V>> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn write<V: Serialize>(path: &Path, format: StoreFormat, data: &BTreeMap<String, V>) -> Result<(), StoreError> {
    let mut value = serde_json::to_value(data).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    prune(&mut value);

    let raw = format.encode(path, &value)?;
    fs::write(path, raw).map_err(|e| StoreError::io(path, e))
}

/// Drop `null` values and empty objects, innermost first.
pub fn prune(value: &mut Value) {
    if let Value::Object(map) = value {
        for child in map.values_mut() {
            prune(child);
        }
        map.retain(|_, child| match child {
            Value::Null => false,
            Value::Object(inner) => !inner.is_empty(),
            _ => true,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{FileStore, StoreFormat, prune};
    use crate::error::StoreError;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::path::Path;

    #[test]
    fn format_follows_extension() {
        assert_eq!(StoreFormat::from_path(Path::new("users.yml")).unwrap(), StoreFormat::Yaml);
        assert_eq!(StoreFormat::from_path(Path::new("users.yaml")).unwrap(), StoreFormat::Yaml);
        assert_eq!(StoreFormat::from_path(Path::new("users.json")).unwrap(), StoreFormat::Json);
        assert!(matches!(
            StoreFormat::from_path(Path::new("users.toml")),
            Err(StoreError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn prune_removes_nulls_and_hollow_objects() {
        let mut value = json!({
            "1": { "language": null },
            "2": { "language": "tr" },
            "3": { "nested": { "deep": {} } },
            "4": 0,
        });
        prune(&mut value);
        assert_eq!(value, json!({ "2": { "language": "tr" }, "4": 0 }));
    }

    #[test]
    fn creates_missing_file_and_folder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("databases").join("store.yml");

        let store: FileStore<String> = FileStore::open(&path).unwrap();
        assert!(path.exists());
        assert!(store.all().is_empty());
    }

    #[test]
    fn json_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store: FileStore<BTreeMap<String, u64>> = FileStore::open(&path).unwrap();
        store
            .update("counter", |current| {
                let mut map = current.unwrap_or_default();
                *map.entry("hits".to_owned()).or_default() += 1;
                map
            })
            .unwrap();
        store
            .update("counter", |current| {
                let mut map = current.unwrap_or_default();
                *map.entry("hits".to_owned()).or_default() += 1;
                map
            })
            .unwrap();
        drop(store);

        let reopened: FileStore<BTreeMap<String, u64>> = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("counter").and_then(|map| map.get("hits").copied()), Some(2));
    }

    #[test]
    fn remove_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.yml");

        let store: FileStore<String> = FileStore::open(&path).unwrap();
        store.set("a", "x".to_owned()).unwrap();
        assert_eq!(store.remove("a").unwrap().as_deref(), Some("x"));
        assert_eq!(store.remove("a").unwrap(), None);

        let reopened: FileStore<String> = FileStore::open(&path).unwrap();
        assert!(reopened.get("a").is_none());
    }
}
