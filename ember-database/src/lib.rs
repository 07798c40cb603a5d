pub mod config;
pub mod error;
pub mod store;
pub mod users;

pub use config::{Config, ConfigStore, env_bool, env_u64};
pub use error::StoreError;
pub use store::{FileStore, StoreFormat};
pub use users::{UserRecord, UserStore};

/// Folder holding the file-backed stores.
pub const DATABASE_DIR: &str = "./databases";
