use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serenity::all::UserId;

use crate::error::StoreError;
use crate::store::FileStore;

/// Per-user preferences.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl UserRecord {
    pub fn is_empty(&self) -> bool {
        self.language.is_none()
    }

    /// Shallow merge: fields set on `patch` win.
    pub fn merge(mut self, patch: UserRecord) -> Self {
        if patch.language.is_some() {
            self.language = patch.language;
        }
        self
    }
}

/// File-backed user preferences keyed by user ID.
#[derive(Debug)]
pub struct UserStore {
    store: FileStore<UserRecord>,
}

impl UserStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Ok(Self {
            store: FileStore::open(path)?,
        })
    }

    pub fn get(&self, user_id: UserId) -> Option<UserRecord> {
        self.store.get(&user_id.to_string())
    }

    pub fn language(&self, user_id: UserId) -> Option<String> {
        self.get(user_id).and_then(|record| record.language)
    }

    pub fn set(
        &self,
        user_id: UserId,
        setter: impl FnOnce(Option<UserRecord>) -> UserRecord,
    ) -> Result<UserRecord, StoreError> {
        let key = user_id.to_string();
        let record = self.store.update(key.clone(), setter)?;
        if record.is_empty() {
            self.store.remove(&key)?;
        }
        Ok(record)
    }

    pub fn overwrite(&self, user_id: UserId, patch: UserRecord) -> Result<UserRecord, StoreError> {
        self.set(user_id, |current| current.unwrap_or_default().merge(patch))
    }

    pub fn set_language(&self, user_id: UserId, locale: impl Into<String>) -> Result<(), StoreError> {
        let patch = UserRecord {
            language: Some(locale.into()),
        };
        self.overwrite(user_id, patch).map(|_| ())
    }

    pub fn clear_language(&self, user_id: UserId) -> Result<(), StoreError> {
        self.set(user_id, |current| UserRecord {
            language: None,
            ..current.unwrap_or_default()
        })
        .map(|_| ())
    }
}
