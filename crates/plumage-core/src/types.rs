//! Core data types for online feature serving
//!
//! These types mirror a wire contract shared with feature writers in
//! other languages; the integer type tags and the shape of the tagged
//! value union are fixed externally and must not change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wire-level type tag for a scalar value
///
/// The integer values come from a shared, externally defined
/// enumeration; they appear verbatim in serialized entity keys, so
/// renumbering them breaks every key already written to the store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ValueType {
    Invalid = 0,
    Bytes = 1,
    String = 2,
    Int32 = 3,
    Int64 = 4,
}

impl ValueType {
    /// The externally defined integer tag for this type
    pub fn tag(self) -> i32 {
        self as i32
    }

    /// Looks up a type by its integer tag
    ///
    /// Returns `None` for tags outside the supported set; callers turn
    /// that into an `UnsupportedType` error rather than guessing.
    pub fn from_tag(tag: i32) -> Option<Self> {
        match tag {
            0 => Some(Self::Invalid),
            1 => Some(Self::Bytes),
            2 => Some(Self::String),
            3 => Some(Self::Int32),
            4 => Some(Self::Int64),
            _ => None,
        }
    }
}

/// A tagged scalar feature value
///
/// Exactly one variant is populated. The closed set of variants is part
/// of the cross-language contract: the stored-value wire format is a
/// self-describing serialization of this union, and the entity-key
/// codec encodes each variant with its [`ValueType`] tag.
///
/// # Examples
///
/// ```
/// use plumage_core::TypedValue;
///
/// let v = TypedValue::Int64(42);
/// assert_eq!(v.value_type().tag(), 4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TypedValue {
    String(String),
    Bytes(Vec<u8>),
    Int32(i32),
    Int64(i64),
}

impl TypedValue {
    /// The wire-level tag corresponding to the populated variant
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::String(_) => ValueType::String,
            Self::Bytes(_) => ValueType::Bytes,
            Self::Int32(_) => ValueType::Int32,
            Self::Int64(_) => ValueType::Int64,
        }
    }
}

/// Identifies one subject (e.g. a customer) for which features are stored
///
/// Join-key names are paired positionally with typed values; the two
/// sequences must be the same length. Two entity keys carrying the same
/// (name, value) pairs in different order are logically equal — the
/// serializer normalizes order, so both produce identical lookup-key
/// bytes.
///
/// # Examples
///
/// ```
/// use plumage_core::{EntityKey, TypedValue};
///
/// let key = EntityKey::single("customer_id", TypedValue::Int64(42));
/// assert_eq!(key.join_keys, vec!["customer_id".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityKey {
    /// Join-key column names (e.g. ["user_id"])
    pub join_keys: Vec<String>,

    /// Entity values, one per join key, in the same order
    pub values: Vec<TypedValue>,
}

impl EntityKey {
    /// Creates an EntityKey from parallel name and value sequences
    ///
    /// Length mismatch is not checked here; the serializer rejects it
    /// with `MalformedEntityKey` so the error surfaces on the read path.
    pub fn new(join_keys: Vec<String>, values: Vec<TypedValue>) -> Self {
        Self { join_keys, values }
    }

    /// Convenience constructor for the common single-join-key case
    pub fn single(name: impl Into<String>, value: TypedValue) -> Self {
        Self {
            join_keys: vec![name.into()],
            values: vec![value],
        }
    }
}

/// Globally unique logical identifier for one materialized feature column
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct FeatureReference {
    /// Feature view the column belongs to (e.g. "user_features")
    pub feature_view: String,

    /// Column name within the view (e.g. "clicks_7d")
    pub feature_name: String,
}

impl FeatureReference {
    pub fn new(feature_view: impl Into<String>, feature_name: impl Into<String>) -> Self {
        Self {
            feature_view: feature_view.into(),
            feature_name: feature_name.into(),
        }
    }
}

/// One decoded feature cell
///
/// Carries the value together with the record's shared "last
/// materialized at" timestamp. Produced only by the read client;
/// immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Which logical column this cell belongs to
    pub reference: FeatureReference,

    /// When the record holding this value was last materialized
    ///
    /// Shared by every feature of the same view for the same entity.
    pub timestamp: DateTime<Utc>,

    /// The decoded value
    pub value: TypedValue,
}
