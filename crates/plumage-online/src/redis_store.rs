//! Redis transport for the online read path
//!
//! Records live in Redis hashes: one hash per entity, keyed by the
//! binary lookup key, with one field per feature plus the view's
//! timestamp field. `HMGET` maps directly onto the multi-field read
//! primitive, and Redis fields are binary-safe, so hashed field ids go
//! over the wire untouched.
//!
//! Uses a multiplexed connection manager (one TCP connection, many
//! concurrent requests); the connection is shared across calls and no
//! per-call state is held.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::Client;
use std::collections::HashMap;

use plumage_core::{EntityKey, Error, Feature, FieldStore, OnlineReadClient, Result};

use crate::config::{RedisMode, RedisOptions};

/// Raw multi-field reads against a single Redis node
pub struct RedisFieldStore {
    conn: ConnectionManager,
}

impl std::fmt::Debug for RedisFieldStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisFieldStore").finish_non_exhaustive()
    }
}

impl RedisFieldStore {
    /// Connects using already-parsed options
    ///
    /// Cluster mode is recognized by the configuration but not served
    /// by this transport yet; it is rejected here, before any I/O.
    pub async fn connect(options: &RedisOptions) -> Result<Self> {
        if options.mode == RedisMode::Cluster {
            return Err(Error::config(
                "only single node Redis is supported at this time",
            ));
        }

        let client = Client::open(options.url())
            .map_err(|e| Error::StoreTransport(anyhow::anyhow!("Redis connection error: {e}")))?;

        let conn = ConnectionManager::new(client).await.map_err(|e| {
            Error::StoreTransport(anyhow::anyhow!("Redis connection manager error: {e}"))
        })?;

        tracing::debug!(address = %options.addresses[0], "connected to Redis");

        Ok(Self { conn })
    }

    /// Health check using PING
    pub async fn health_check(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::StoreTransport(anyhow::anyhow!("Redis PING failed: {e}")))?;

        if pong != "PONG" {
            return Err(Error::StoreTransport(anyhow::anyhow!(
                "Redis health check failed: expected PONG, got {pong}"
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl FieldStore for RedisFieldStore {
    /// One HMGET; Redis returns nil for fields the hash doesn't hold,
    /// which surfaces as `None` in the aligned result.
    async fn get_fields(&self, key: &[u8], fields: &[Vec<u8>]) -> Result<Vec<Option<Vec<u8>>>> {
        let mut conn = self.conn.clone();
        redis::cmd("HMGET")
            .arg(key)
            .arg(fields)
            .query_async::<_, Vec<Option<Vec<u8>>>>(&mut conn)
            .await
            .map_err(|e| Error::StoreTransport(anyhow::anyhow!("Redis HMGET error: {e}")))
    }

    /// One pipeline of HMGETs, a single round trip for all keys
    ///
    /// No MULTI/EXEC: entities need no atomicity relative to each
    /// other, only each HMGET's own single-hash snapshot.
    async fn get_fields_batch(
        &self,
        keys: &[Vec<u8>],
        fields: &[Vec<u8>],
    ) -> Result<Vec<Vec<Option<Vec<u8>>>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn.clone();
        let mut pipe = redis::pipe();
        for key in keys {
            pipe.cmd("HMGET").arg(key.as_slice()).arg(fields);
        }

        pipe.query_async::<_, Vec<Vec<Option<Vec<u8>>>>>(&mut conn)
            .await
            .map_err(|e| Error::StoreTransport(anyhow::anyhow!("Redis pipeline error: {e}")))
    }
}

/// Redis-backed online feature store
///
/// Ties configuration parsing, connection establishment, and the read
/// client together behind one constructor.
///
/// # Example
///
/// ```rust,ignore
/// use plumage_online::RedisOnlineStore;
/// use std::collections::HashMap;
///
/// let mut options = HashMap::new();
/// options.insert("connection_string".to_string(), "localhost:6379".to_string());
/// let store = RedisOnlineStore::new("proj", &options).await?;
/// let rows = store.read(&keys, "txn_stats", &features).await?;
/// ```
pub struct RedisOnlineStore {
    client: OnlineReadClient<RedisFieldStore>,
}

impl std::fmt::Debug for RedisOnlineStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisOnlineStore").finish_non_exhaustive()
    }
}

impl RedisOnlineStore {
    /// Creates the store from the raw options mapping
    ///
    /// Bad configuration or an unreachable server fails here; a store
    /// that never constructed never serves a read.
    pub async fn new(
        project: impl Into<String>,
        options: &HashMap<String, String>,
    ) -> Result<Self> {
        let parsed = RedisOptions::from_map(options)?;
        let store = RedisFieldStore::connect(&parsed).await?;
        Ok(Self {
            client: OnlineReadClient::new(project, store),
        })
    }

    /// Reads the latest feature values for every entity key
    ///
    /// See [`OnlineReadClient::read`] for the full result contract:
    /// positionally aligned, `None` for absent features, all-or-nothing
    /// on any decode failure.
    pub async fn read(
        &self,
        entity_keys: &[EntityKey],
        view: &str,
        features: &[String],
    ) -> Result<Vec<Vec<Option<Feature>>>> {
        self.client.read(entity_keys, view, features).await
    }

    /// Same contract as [`read`](Self::read), all entities in one
    /// pipelined round trip
    pub async fn read_pipelined(
        &self,
        entity_keys: &[EntityKey],
        view: &str,
        features: &[String],
    ) -> Result<Vec<Vec<Option<Feature>>>> {
        self.client
            .read_pipelined(entity_keys, view, features)
            .await
    }

    pub async fn health_check(&self) -> Result<()> {
        self.client.store().health_check().await
    }

    pub fn store_type(&self) -> &'static str {
        "redis"
    }
}
