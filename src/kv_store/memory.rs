use super::{KeyValueStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Data {
    // Members keep their insertion order
    sets: HashMap<String, Vec<String>>,
    hashes: HashMap<String, HashMap<String, String>>,
    scalars: HashMap<String, String>,
}

/// Process-local store for development and tests.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: Mutex<Data>,
}

impl InMemoryStore {
    fn lock(&self) -> Result<MutexGuard<'_, Data>, StoreError> {
        self.data
            .lock()
            .map_err(|_| anyhow::anyhow!("The in-memory store lock is poisoned").into())
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        let mut data = self.lock()?;
        let members = data.sets.entry(key.to_string()).or_default();
        if members.iter().any(|m| m == member) {
            return Ok(false);
        }
        members.push(member.to_string());
        Ok(true)
    }

    async fn set_contains(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        let data = self.lock()?;
        Ok(data
            .sets
            .get(key)
            .is_some_and(|members| members.iter().any(|m| m == member)))
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, StoreError> {
        let data = self.lock()?;
        Ok(data.sets.get(key).cloned().unwrap_or_default())
    }

    async fn set_cardinality(&self, key: &str) -> Result<u64, StoreError> {
        let data = self.lock()?;
        Ok(data.sets.get(key).map_or(0, |members| members.len() as u64))
    }

    async fn hash_set(
        &self,
        key: &str,
        fields: HashMap<String, String>,
    ) -> Result<(), StoreError> {
        let mut data = self.lock()?;
        data.hashes
            .entry(key.to_string())
            .or_default()
            .extend(fields);
        Ok(())
    }

    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        let data = self.lock()?;
        Ok(data.hashes.get(key).cloned().unwrap_or_default())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let data = self.lock()?;
        Ok(data.scalars.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut data = self.lock()?;
        data.scalars.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
