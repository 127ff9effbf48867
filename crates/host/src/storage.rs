// Path: crates/host/src/storage.rs
//! Run-local storage overlay.
//!
//! Writes never leave the process: `put` and `delete` land in an
//! in-memory map keyed by owning script hash and raw key. A `delete` is
//! an empty-bytes tombstone, indistinguishable from storing an empty
//! value, which matches how the chain represents absent storage. Reads
//! that miss the overlay are the caller's problem; the overlay never
//! caches remote values (see [`crate::context::RunContext`]).

use std::collections::HashMap;

use dryrun_types::error::InteropError;
use dryrun_types::{Hash160, StorageContext};

#[derive(Debug, Default)]
pub struct StorageOverlay {
    entries: HashMap<(Hash160, Vec<u8>), Vec<u8>>,
}

impl StorageOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value written during this run, if any. An empty slice here is a
    /// tombstone and still counts as a hit.
    pub fn cached(&self, script_hash: &Hash160, key: &[u8]) -> Option<&[u8]> {
        self.entries
            .get(&(*script_hash, key.to_vec()))
            .map(Vec::as_slice)
    }

    pub fn put(
        &mut self,
        ctx: &StorageContext,
        key: Vec<u8>,
        value: Vec<u8>,
    ) -> Result<(), InteropError> {
        if ctx.read_only {
            return Err(InteropError::ReadOnlyViolation);
        }
        self.entries.insert((ctx.script_hash, key), value);
        Ok(())
    }

    pub fn delete(&mut self, ctx: &StorageContext, key: Vec<u8>) -> Result<(), InteropError> {
        self.put(ctx, key, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Flat database key the node indexes storage by: big-endian hex of the
/// owning script hash followed by hex of the raw key.
pub fn db_key(script_hash: &Hash160, key: &[u8]) -> String {
    format!("{}{}", script_hash.to_hex(), hex::encode(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> StorageContext {
        StorageContext::new(Hash160([0xab; 20]))
    }

    #[test]
    fn put_then_cached_hit() {
        let mut overlay = StorageOverlay::new();
        overlay.put(&ctx(), b"k".to_vec(), b"v".to_vec()).unwrap();
        assert_eq!(overlay.cached(&ctx().script_hash, b"k"), Some(&b"v"[..]));
        assert_eq!(overlay.cached(&ctx().script_hash, b"other"), None);
    }

    #[test]
    fn delete_leaves_tombstone() {
        let mut overlay = StorageOverlay::new();
        overlay.put(&ctx(), b"k".to_vec(), b"v".to_vec()).unwrap();
        overlay.delete(&ctx(), b"k".to_vec()).unwrap();
        // A tombstone is a hit with empty bytes, not a miss.
        assert_eq!(overlay.cached(&ctx().script_hash, b"k"), Some(&[][..]));
    }

    #[test]
    fn read_only_context_cannot_write() {
        let mut overlay = StorageOverlay::new();
        let ro = ctx().as_read_only();
        assert!(matches!(
            overlay.put(&ro, b"k".to_vec(), b"v".to_vec()),
            Err(InteropError::ReadOnlyViolation)
        ));
        assert!(matches!(
            overlay.delete(&ro, b"k".to_vec()),
            Err(InteropError::ReadOnlyViolation)
        ));
        assert!(overlay.is_empty());
    }

    #[test]
    fn keys_are_scoped_per_contract() {
        let mut overlay = StorageOverlay::new();
        let other = StorageContext::new(Hash160([0xcd; 20]));
        overlay.put(&ctx(), b"k".to_vec(), b"a".to_vec()).unwrap();
        overlay.put(&other, b"k".to_vec(), b"b".to_vec()).unwrap();
        assert_eq!(overlay.cached(&ctx().script_hash, b"k"), Some(&b"a"[..]));
        assert_eq!(overlay.cached(&other.script_hash, b"k"), Some(&b"b"[..]));
    }

    #[test]
    fn db_key_is_hash_hex_plus_key_hex() {
        let h = Hash160([0x01; 20]);
        assert_eq!(
            db_key(&h, &[0xff, 0x00]),
            format!("{}ff00", "01".repeat(20))
        );
    }
}
