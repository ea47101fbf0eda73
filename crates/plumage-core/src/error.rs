//! Error types for Plumage
//!
//! All failures on the read path are strongly typed and surfaced
//! synchronously to the caller. Nothing is retried internally, and a
//! failure for any single entity aborts the whole batched read.

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors on the online read path
///
/// Each variant represents a different category of error with relevant
/// context. The `#[error(...)]` attribute defines the display message.
#[derive(Error, Debug)]
pub enum Error {
    /// Entity key join-key names and values don't line up
    ///
    /// An entity key must carry exactly one value per join-key name.
    #[error("entity key has {join_keys} join key name(s) but {values} value(s)")]
    MalformedEntityKey { join_keys: usize, values: usize },

    /// Unrecognized or unpopulated typed value
    ///
    /// The value codec only handles the closed set of scalar variants.
    /// No default or zero value is ever substituted.
    #[error("unsupported value type: {0}")]
    UnsupportedType(String),

    /// Stored value bytes failed to parse
    ///
    /// The store persists a self-describing serialized value; if those
    /// bytes don't decode, the whole read is aborted.
    #[error("failed to decode stored value: {0}")]
    StoreDecode(String),

    /// Timestamp field absent or unparseable for an entity's record
    ///
    /// Every record carries one shared "last materialized at" timestamp.
    /// A record without a readable timestamp is unusable as a whole,
    /// unlike a missing feature field which is reported as absent.
    #[error("timestamp field missing or unparseable: {0}")]
    MissingTimestamp(String),

    /// Network/protocol failure from the underlying store
    ///
    /// Propagated unmodified; the caller owns retry policy.
    #[error("store transport error: {0}")]
    StoreTransport(#[from] anyhow::Error),

    /// Invalid configuration
    ///
    /// Raised at construction time; a misconfigured store never serves
    /// a read.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Creates an UnsupportedType error from a string
    pub fn unsupported_type(msg: impl Into<String>) -> Self {
        Self::UnsupportedType(msg.into())
    }

    /// Creates a StoreDecode error from a string
    pub fn store_decode(msg: impl Into<String>) -> Self {
        Self::StoreDecode(msg.into())
    }

    /// Creates a MissingTimestamp error from a string
    pub fn missing_timestamp(msg: impl Into<String>) -> Self {
        Self::MissingTimestamp(msg.into())
    }

    /// Creates a Config error from a string
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MalformedEntityKey {
            join_keys: 2,
            values: 1,
        };
        assert_eq!(
            err.to_string(),
            "entity key has 2 join key name(s) but 1 value(s)"
        );
    }

    #[test]
    fn test_error_helpers() {
        let err = Error::config("unknown redis_type");
        assert!(matches!(err, Error::Config(_)));

        let err = Error::missing_timestamp("no _ts:view field");
        assert!(matches!(err, Error::MissingTimestamp(_)));
    }
}
