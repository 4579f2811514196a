//! Content hashing for change detection.
//!
//! The editor decides whether a frame changed the map, and whether the map
//! needs saving, by comparing hashes of the encoded snapshot. Only the plain
//! snapshot bytes are hashed, never the live map.
//!
//! Hashes are stable within a process. They are not persisted, so stability
//! across toolchain versions is not required.

use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;

use crate::error::Result;
use crate::snapshot::MapSnapshot;

/// Hash an encoded snapshot (or any byte string).
#[must_use]
pub fn content_hash(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    hasher.write(bytes);
    hasher.finish()
}

/// Hash a snapshot through its byte encoding.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be encoded.
pub fn hash_snapshot(snapshot: &MapSnapshot) -> Result<u64> {
    Ok(content_hash(&snapshot.encode()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn snapshot(tile: u32) -> MapSnapshot {
        MapSnapshot {
            layers: vec![vec![vec![0, tile], vec![tile, 0]]],
            enemy_pos: vec![[1.0, 2.0]],
            spawn: [0.0, 0.0],
            trigger_tags: BTreeMap::from([("0 1".to_string(), "door".to_string())]),
        }
    }

    #[test]
    fn test_identical_snapshots_hash_equal() {
        assert_eq!(
            hash_snapshot(&snapshot(3)).unwrap(),
            hash_snapshot(&snapshot(3)).unwrap()
        );
    }

    #[test]
    fn test_different_snapshots_hash_differ() {
        assert_ne!(
            hash_snapshot(&snapshot(3)).unwrap(),
            hash_snapshot(&snapshot(4)).unwrap()
        );
    }

    #[test]
    fn test_tag_insertion_order_does_not_matter() {
        let mut a = snapshot(1);
        let mut b = snapshot(1);
        a.trigger_tags.insert("5 5".into(), "x".into());
        a.trigger_tags.insert("2 2".into(), "y".into());
        b.trigger_tags.insert("2 2".into(), "y".into());
        b.trigger_tags.insert("5 5".into(), "x".into());
        assert_eq!(hash_snapshot(&a).unwrap(), hash_snapshot(&b).unwrap());
    }
}
