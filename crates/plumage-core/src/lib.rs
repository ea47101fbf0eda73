//! # Plumage Core Library
//!
//! Store-agnostic heart of the online feature-serving read path: given
//! entity identifiers and requested feature names, produce the most
//! recently materialized values and their timestamps from a key-value
//! store, byte-for-byte compatible with feature writers implemented in
//! other languages.
//!
//! ## Key Components
//!
//! - **Types**: the tagged scalar union, entity keys, feature references
//! - **Serialize**: the deterministic entity-key / lookup-key codec
//! - **FieldHash**: 4-byte hashed field identifiers within a record
//! - **OnlineReadClient**: batched read assembly over a [`FieldStore`]
//!
//! Connection establishment and the store's own wire protocol live in
//! transport crates (see `plumage-online` for Redis); this crate only
//! defines the primitive it needs from them.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use plumage_core::{EntityKey, OnlineReadClient, TypedValue};
//!
//! async fn serve(client: &OnlineReadClient<impl plumage_core::FieldStore>) {
//!     let keys = vec![EntityKey::single("customer_id", TypedValue::Int64(42))];
//!     let rows = client.read(&keys, "txn_stats", &["amount".to_string()]).await?;
//! }
//! ```

pub use error::{Error, Result};
pub use field_hash::{feature_field_id, find_collision, timestamp_field};
pub use online_store::{FieldStore, OnlineReadClient};
pub use serialize::{build_lookup_key, decode_value, encode_value, serialize_entity_key};
pub use types::{EntityKey, Feature, FeatureReference, TypedValue, ValueType};
pub use wire::{decode_stored_timestamp, decode_stored_value};

mod error;
mod field_hash;
mod online_store;
mod serialize;
mod types;
mod wire;

/// Commonly used imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::online_store::{FieldStore, OnlineReadClient};
    pub use crate::types::{EntityKey, Feature, FeatureReference, TypedValue, ValueType};
}
