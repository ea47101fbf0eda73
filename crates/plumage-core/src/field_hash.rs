//! Field identifiers within a store record
//!
//! A record holds one field per feature plus one shared timestamp
//! field. Feature fields are addressed by a 4-byte MurmurHash3 of
//! `"<view>:<feature>"`; the timestamp field keeps a human-readable
//! name so operators can spot it in the store.
//!
//! The hash algorithm and seed are a wire contract: every previously
//! written record becomes unreachable if either changes. Distinct
//! (view, feature) pairs are *assumed*, not guaranteed, to hash to
//! distinct identifiers — the read path has no collision recovery, so
//! [`find_collision`] exists as a detection hook for tests and the
//! read client's warning log.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::io::Cursor;

use murmur3::murmur3_32;

/// Seed shared with external writers. Never change it.
const FIELD_HASH_SEED: u32 = 0;

/// Derives the 4-byte field identifier for one feature column
///
/// Deterministic across processes and versions: MurmurHash3 x86 32-bit
/// over the UTF-8 bytes of `"<view>:<feature>"`, emitted little-endian.
/// Stateless — each call hashes from scratch.
pub fn feature_field_id(view: &str, feature: &str) -> [u8; 4] {
    let input = format!("{view}:{feature}");
    // Reading from an in-memory buffer cannot fail.
    let hash = murmur3_32(&mut Cursor::new(input.as_bytes()), FIELD_HASH_SEED)
        .expect("in-memory hash input");
    hash.to_le_bytes()
}

/// The fixed timestamp field name for a feature view
///
/// Not hashed: one record-wide "last materialized at" timestamp is
/// shared by all features of the view.
pub fn timestamp_field(view: &str) -> String {
    format!("_ts:{view}")
}

/// Reports the first pair of features whose field identifiers collide
///
/// Collisions are a silent correctness hazard on the read path (two
/// features would address the same stored bytes). This hook detects
/// them without altering the on-the-wire hash; the read client logs a
/// warning when it fires.
pub fn find_collision<'a>(view: &str, features: &'a [String]) -> Option<(&'a str, &'a str)> {
    let mut seen: HashMap<[u8; 4], &'a str> = HashMap::with_capacity(features.len());
    for feature in features {
        let id = feature_field_id(view, feature);
        match seen.entry(id) {
            Entry::Occupied(entry) => {
                let earlier = *entry.get();
                if earlier != feature.as_str() {
                    return Some((earlier, feature));
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(feature);
            }
        }
    }
    None
}
