use super::{KeyValueStore, StoreError};
use async_trait::async_trait;
use fred::prelude::*;
use std::collections::HashMap;

/// Store backed by a Redis (or Valkey) connection pool.
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool,
    pool_size: usize,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("pool_size", &self.pool_size)
            .finish()
    }
}

impl RedisStore {
    #[tracing::instrument(name = "Connecting to Redis", skip(redis_uri))]
    pub async fn connect(redis_uri: &str, pool_size: usize) -> Result<Self, StoreError> {
        let redis_config = Config::from_url(redis_uri)?;
        let pool = Pool::new(redis_config, None, None, None, pool_size)?;

        let redis_conn = pool.connect();
        pool.wait_for_connect().await?;

        // Keep the connection tasks alive for as long as the pool lives
        tokio::spawn(async move {
            let _ = redis_conn.await;
        });

        Ok(Self { pool, pool_size })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn set_add(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        let added: i64 = self.pool.sadd(key, member).await?;
        Ok(added > 0)
    }

    async fn set_contains(&self, key: &str, member: &str) -> Result<bool, StoreError> {
        Ok(self.pool.sismember(key, member).await?)
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.pool.smembers(key).await?)
    }

    async fn set_cardinality(&self, key: &str) -> Result<u64, StoreError> {
        Ok(self.pool.scard(key).await?)
    }

    async fn hash_set(
        &self,
        key: &str,
        fields: HashMap<String, String>,
    ) -> Result<(), StoreError> {
        let _: i64 = self.pool.hset(key, fields).await?;
        Ok(())
    }

    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        Ok(self.pool.hgetall(key).await?)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.pool.get(key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _: () = self.pool.set(key, value, None, None, false).await?;
        Ok(())
    }
}
