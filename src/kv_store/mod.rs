//! Access to the key-value service holding subscribers and report markers.
//!
//! ## Key layout
//!
//! ```text
//! subscriber:{email}               → hash (email, timestamp, source, domain)
//! subscribers:emails               → set of every normalized email
//! subscribers:today:{YYYY-MM-DD}   → set of emails that signed up that day
//! subscribers:lastUpdate           → ISO timestamp of the latest signup
//! reports:lastSent                 → date of the last delivered daily report
//! ```

mod keys;
mod memory;
mod redis;

pub use keys::*;
pub use memory::InMemoryStore;
pub use redis::RedisStore;

use async_trait::async_trait;
use std::collections::HashMap;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("The Redis store rejected the command.")]
    Redis(#[from] fred::error::Error),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// The handful of set, hash and scalar operations the service relies on.
///
/// Reads of absent keys are not errors: an absent set is empty, an absent
/// hash has no fields and an absent scalar is `None`.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Returns `true` when `member` was not in the set before.
    async fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError>;

    async fn set_contains(&self, key: &str, member: &str) -> Result<bool, StoreError>;

    async fn set_members(&self, key: &str) -> Result<Vec<String>, StoreError>;

    async fn set_cardinality(&self, key: &str) -> Result<u64, StoreError>;

    async fn hash_set(&self, key: &str, fields: HashMap<String, String>)
    -> Result<(), StoreError>;

    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError>;

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
