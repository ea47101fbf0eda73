//! Plumage Online Store - Redis-backed feature serving
//!
//! This crate is the Redis transport for the Plumage read path: it
//! parses the store's options mapping, owns the connection, and wires
//! the core read client onto `HMGET`-shaped record reads.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   lookup key + field ids   ┌───────────────┐
//! │ plumage-core │ ─────────────────────────► │ RedisFieldStore│
//! │ read client  │ ◄───────────────────────── │ (HMGET / pipe) │
//! └──────────────┘   aligned raw field bytes  └───────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use plumage_online::RedisOnlineStore;
//! use plumage_core::{EntityKey, TypedValue};
//! use std::collections::HashMap;
//!
//! let mut options = HashMap::new();
//! options.insert("connection_string".to_string(), "localhost:6379".to_string());
//!
//! let store = RedisOnlineStore::new("proj", &options).await?;
//! let rows = store
//!     .read(
//!         &[EntityKey::single("customer_id", TypedValue::Int64(42))],
//!         "txn_stats",
//!         &["amount".to_string(), "count".to_string()],
//!     )
//!     .await?;
//! ```

// Re-export core types
pub use plumage_core::{
    build_lookup_key, feature_field_id, timestamp_field, EntityKey, Error, Feature,
    FeatureReference, FieldStore, OnlineReadClient, Result, TypedValue, ValueType,
};

pub mod config;
pub use config::{RedisMode, RedisOptions};

pub mod redis_store;
pub use redis_store::{RedisFieldStore, RedisOnlineStore};
