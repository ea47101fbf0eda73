//! Read-assembly over a multi-field key-value store
//!
//! The store exposes one primitive: "get named fields of the record at
//! this key". [`FieldStore`] abstracts that primitive so the assembly
//! logic can be exercised without a live store; the Redis transport
//! lives in `plumage-online`.
//!
//! ## Read protocol
//!
//! For a request of N features over one view:
//!
//! 1. Hash every feature to its 4-byte field id (request order), then
//!    append the view's fixed timestamp field — N+1 field ids, reused
//!    for every entity.
//! 2. Per entity: build the lookup key, fetch all N+1 fields in one
//!    store call.
//! 3. The last response element must decode as the record timestamp;
//!    otherwise the whole read fails with `MissingTimestamp`.
//! 4. Each remaining element decodes through the stored-value wire
//!    format into one [`Feature`] sharing that timestamp. A field the
//!    store has no value for stays `None` at its position.
//!
//! Results are positionally aligned: outer with `entity_keys`, inner
//! with `features`. Any decode failure for any entity aborts the whole
//! call — there is no partial-success return.
//!
//! ## Scheduling
//!
//! [`OnlineReadClient::read`] issues one round trip per entity,
//! strictly sequentially. [`OnlineReadClient::read_pipelined`] keeps
//! the identical result contract but lets the transport batch all
//! entities into one pipelined request (no cross-entity atomicity;
//! each entity's field set is still one consistent multi-field read).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::field_hash::{feature_field_id, find_collision, timestamp_field};
use crate::serialize::build_lookup_key;
use crate::types::{EntityKey, Feature, FeatureReference};
use crate::wire::{decode_stored_timestamp, decode_stored_value};

/// The store's native multi-field read primitive
///
/// Implementations own connection state and map their transport errors
/// into [`Error::StoreTransport`]. They must not reorder fields: the
/// returned sequence is positionally aligned with `fields`, with `None`
/// where the record has no value for that field.
#[async_trait]
pub trait FieldStore: Send + Sync {
    /// Reads the named fields of the record at `key`
    async fn get_fields(&self, key: &[u8], fields: &[Vec<u8>]) -> Result<Vec<Option<Vec<u8>>>>;

    /// Reads the same fields of several records
    ///
    /// The default implementation is one round trip per key. Transports
    /// with a pipelining facility should override it; the result
    /// contract (outer alignment with `keys`, inner with `fields`) is
    /// identical either way.
    async fn get_fields_batch(
        &self,
        keys: &[Vec<u8>],
        fields: &[Vec<u8>],
    ) -> Result<Vec<Vec<Option<Vec<u8>>>>> {
        let mut rows = Vec::with_capacity(keys.len());
        for key in keys {
            rows.push(self.get_fields(key, fields).await?);
        }
        Ok(rows)
    }
}

/// Assembles ordered feature results from raw store reads
///
/// Stateless across calls: each `read` is independent, and the
/// underlying connection is whatever the transport holds.
///
/// # Example
///
/// ```rust,ignore
/// use plumage_core::{EntityKey, OnlineReadClient, TypedValue};
///
/// let client = OnlineReadClient::new("proj", store);
/// let rows = client
///     .read(
///         &[EntityKey::single("customer_id", TypedValue::Int64(42))],
///         "txn_stats",
///         &["amount".to_string(), "count".to_string()],
///     )
///     .await?;
/// ```
pub struct OnlineReadClient<S> {
    project: String,
    store: S,
}

impl<S: FieldStore> OnlineReadClient<S> {
    pub fn new(project: impl Into<String>, store: S) -> Self {
        Self {
            project: project.into(),
            store,
        }
    }

    /// The project all lookup keys are scoped to
    pub fn project(&self) -> &str {
        &self.project
    }

    /// The underlying transport
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads the latest values of `features` for every entity key
    ///
    /// One store round trip per entity, in request order. Returns one
    /// inner vector per entity, aligned with `entity_keys`; each inner
    /// vector is aligned with `features`, with `None` marking a feature
    /// the store holds no value for.
    pub async fn read(
        &self,
        entity_keys: &[EntityKey],
        view: &str,
        features: &[String],
    ) -> Result<Vec<Vec<Option<Feature>>>> {
        let fields = request_fields(view, features);

        let mut results = Vec::with_capacity(entity_keys.len());
        for entity_key in entity_keys {
            let lookup_key = build_lookup_key(&self.project, entity_key)?;
            let row = self.store.get_fields(&lookup_key, &fields).await?;
            results.push(assemble_row(view, features, row)?);
        }

        tracing::debug!(
            view = view,
            entities = entity_keys.len(),
            features = features.len(),
            "online read complete"
        );

        Ok(results)
    }

    /// Same contract as [`read`](Self::read), one pipelined store call
    ///
    /// All lookup keys go to the transport in a single
    /// [`FieldStore::get_fields_batch`] call. No atomicity across
    /// entities; each entity's fields are still one consistent read.
    pub async fn read_pipelined(
        &self,
        entity_keys: &[EntityKey],
        view: &str,
        features: &[String],
    ) -> Result<Vec<Vec<Option<Feature>>>> {
        let fields = request_fields(view, features);

        let lookup_keys = entity_keys
            .iter()
            .map(|entity_key| build_lookup_key(&self.project, entity_key))
            .collect::<Result<Vec<_>>>()?;

        let rows = self.store.get_fields_batch(&lookup_keys, &fields).await?;

        tracing::debug!(
            view = view,
            entities = entity_keys.len(),
            features = features.len(),
            "pipelined online read complete"
        );

        rows.into_iter()
            .map(|row| assemble_row(view, features, row))
            .collect()
    }
}

/// Field ids for one request: every feature hashed in request order,
/// then the view's timestamp field last.
fn request_fields(view: &str, features: &[String]) -> Vec<Vec<u8>> {
    if let Some((a, b)) = find_collision(view, features) {
        tracing::warn!(
            view = view,
            first = a,
            second = b,
            "field id collision: these features address the same stored bytes"
        );
    }

    let mut fields = Vec::with_capacity(features.len() + 1);
    for feature in features {
        fields.push(feature_field_id(view, feature).to_vec());
    }
    fields.push(timestamp_field(view).into_bytes());
    fields
}

/// Decodes one entity's raw field values into ordered features
fn assemble_row(
    view: &str,
    features: &[String],
    mut row: Vec<Option<Vec<u8>>>,
) -> Result<Vec<Option<Feature>>> {
    if row.len() != features.len() + 1 {
        return Err(Error::store_decode(format!(
            "store returned {} fields, expected {}",
            row.len(),
            features.len() + 1
        )));
    }

    // The timestamp rides in the last slot and is mandatory: a record
    // without a readable timestamp is unusable as a whole, while a
    // missing feature below is merely absent. That asymmetry is part
    // of the contract.
    let timestamp = decode_row_timestamp(view, row.pop().flatten())?;

    let mut decoded = Vec::with_capacity(features.len());
    for (feature, cell) in features.iter().zip(row) {
        match cell {
            None => decoded.push(None),
            Some(bytes) => {
                let value = decode_stored_value(&bytes)?;
                decoded.push(Some(Feature {
                    reference: FeatureReference::new(view, feature),
                    timestamp,
                    value,
                }));
            }
        }
    }

    Ok(decoded)
}

fn decode_row_timestamp(view: &str, bytes: Option<Vec<u8>>) -> Result<DateTime<Utc>> {
    let bytes = bytes.ok_or_else(|| {
        Error::missing_timestamp(format!("record has no {} field", timestamp_field(view)))
    })?;
    decode_stored_timestamp(&bytes).map_err(|e| {
        Error::missing_timestamp(format!("{} field: {e}", timestamp_field(view)))
    })
}
