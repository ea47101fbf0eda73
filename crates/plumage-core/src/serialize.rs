//! Entity-key and scalar-value codecs
//!
//! These functions produce the exact bytes external writers produce, so
//! reads land on the records those writers created. Every choice here —
//! little-endian tags, sorted join keys, the 32-bit integer encoding —
//! is a compatibility contract, not a preference.
//!
//! ## Lookup key layout
//!
//! ```text
//! serialize_entity_key(k) = name segments ++ value segments
//!   name segment:  LE32(STRING tag) ++ UTF8(join key name)
//!   value segment: LE32(value tag)  ++ LE32(encoded len) ++ encoded value
//! build_lookup_key(p, k) = serialize_entity_key(k) ++ UTF8(p)
//! ```
//!
//! Join keys are sorted lexicographically before either pass, so the
//! bytes are a function of the (name, value) *set*, not of input order.
//!
//! Name segments carry no length prefix: the buffer cannot be parsed
//! back into discrete names without the key schema. This is a one-way,
//! write/compare-only encoding — there is deliberately no decoder for
//! it anywhere in this crate.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::types::{EntityKey, TypedValue, ValueType};

/// Encodes a single scalar to its compact binary form, reporting the
/// wire tag used so callers can embed it in headers.
///
/// - `String`: raw UTF-8 bytes, untouched
/// - `Bytes`: passed through untouched
/// - `Int32`: 4-byte little-endian two's complement
/// - `Int64`: **low 32 bits only**, 4-byte little-endian — an
///   established wire format predates 64-bit support here, and values
///   outside the signed 32-bit range silently lose their high bits.
///   Changing this breaks cross-language key compatibility.
pub fn encode_value(value: &TypedValue) -> Result<(Vec<u8>, ValueType)> {
    match value {
        TypedValue::String(s) => Ok((s.as_bytes().to_vec(), ValueType::String)),
        TypedValue::Bytes(b) => Ok((b.clone(), ValueType::Bytes)),
        TypedValue::Int32(v) => Ok((v.to_le_bytes().to_vec(), ValueType::Int32)),
        TypedValue::Int64(v) => Ok(((*v as u32).to_le_bytes().to_vec(), ValueType::Int64)),
    }
}

/// Decodes the bytes produced by [`encode_value`] for the given tag.
///
/// `Int64` reads 4 bytes and sign-extends; the original producer never
/// specified the upper 32 bits, so sign extension is this crate's
/// recorded convention. Values encoded from outside the signed 32-bit
/// range do not round-trip.
pub fn decode_value(bytes: &[u8], value_type: ValueType) -> Result<TypedValue> {
    match value_type {
        ValueType::String => {
            let s = std::str::from_utf8(bytes)
                .map_err(|e| Error::store_decode(format!("invalid UTF-8 in string value: {e}")))?;
            Ok(TypedValue::String(s.to_string()))
        }
        ValueType::Bytes => Ok(TypedValue::Bytes(bytes.to_vec())),
        ValueType::Int32 => Ok(TypedValue::Int32(i32::from_le_bytes(int_bytes(bytes)?))),
        ValueType::Int64 => Ok(TypedValue::Int64(
            i32::from_le_bytes(int_bytes(bytes)?) as i64
        )),
        ValueType::Invalid => Err(Error::unsupported_type(
            "cannot decode a value tagged INVALID",
        )),
    }
}

fn int_bytes(bytes: &[u8]) -> Result<[u8; 4]> {
    bytes.try_into().map_err(|_| {
        Error::store_decode(format!(
            "integer value must be 4 bytes, got {}",
            bytes.len()
        ))
    })
}

/// Serializes an entity key to the canonical byte string used to
/// address its record in the store.
///
/// Pure and deterministic: two entity keys with the same (name, value)
/// pairs produce identical bytes regardless of input order.
pub fn serialize_entity_key(entity_key: &EntityKey) -> Result<Vec<u8>> {
    if entity_key.join_keys.len() != entity_key.values.len() {
        return Err(Error::MalformedEntityKey {
            join_keys: entity_key.join_keys.len(),
            values: entity_key.values.len(),
        });
    }

    // BTreeMap gives the canonical lexicographic key order for free.
    let sorted: BTreeMap<&str, &TypedValue> = entity_key
        .join_keys
        .iter()
        .map(String::as_str)
        .zip(entity_key.values.iter())
        .collect();

    let mut buffer = Vec::new();

    // Pass one: all name segments.
    for name in sorted.keys() {
        buffer.extend_from_slice(&(ValueType::String.tag() as u32).to_le_bytes());
        buffer.extend_from_slice(name.as_bytes());
    }

    // Pass two: all value segments, in the same sorted order.
    for value in sorted.values() {
        let (encoded, value_type) = encode_value(value)?;
        buffer.extend_from_slice(&(value_type.tag() as u32).to_le_bytes());
        buffer.extend_from_slice(&(encoded.len() as u32).to_le_bytes());
        buffer.extend_from_slice(&encoded);
    }

    Ok(buffer)
}

/// Builds the full lookup key for one entity within a project
///
/// The project name's raw UTF-8 bytes follow the serialized entity key
/// with no delimiter. External writers build the identical bytes.
pub fn build_lookup_key(project: &str, entity_key: &EntityKey) -> Result<Vec<u8>> {
    let mut key = serialize_entity_key(entity_key)?;
    key.extend_from_slice(project.as_bytes());
    Ok(key)
}
