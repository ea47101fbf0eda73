//! Stored-value and timestamp wire formats
//!
//! Records in the store do not hold raw codec bytes: writers persist a
//! self-describing serialization of [`TypedValue`] (its externally
//! tagged JSON form, e.g. `{"Int64":42}`) and an RFC 3339 timestamp.
//! Both contracts predate this crate; we consume them faithfully and
//! never reinterpret undecodable bytes as defaults.

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::types::TypedValue;

/// Decodes one stored feature value
///
/// Fails with [`Error::StoreDecode`] if the bytes are not a valid
/// serialized value; the caller treats that as fatal for the whole
/// read, never as a missing feature.
pub fn decode_stored_value(bytes: &[u8]) -> Result<TypedValue> {
    serde_json::from_slice(bytes)
        .map_err(|e| Error::store_decode(format!("stored value is not a typed value: {e}")))
}

/// Decodes the record-wide materialization timestamp
pub fn decode_stored_timestamp(bytes: &[u8]) -> Result<DateTime<Utc>> {
    serde_json::from_slice(bytes)
        .map_err(|e| Error::store_decode(format!("stored timestamp is unparseable: {e}")))
}
