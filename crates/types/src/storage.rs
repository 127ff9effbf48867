// Path: crates/types/src/storage.rs
//! The storage capability token threaded on the VM stack.

use serde::{Deserialize, Serialize};

use crate::hash::Hash160;

/// Authorizes storage syscalls against one contract's key space.
///
/// Carries no data itself. The read-only flag is independent of the
/// script hash: deriving a read-only context leaves the original
/// untouched, and re-deriving from an already read-only context is a
/// no-op copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageContext {
    pub script_hash: Hash160,
    pub read_only: bool,
}

impl StorageContext {
    pub fn new(script_hash: Hash160) -> Self {
        Self {
            script_hash,
            read_only: false,
        }
    }

    pub fn read_only(script_hash: Hash160) -> Self {
        Self {
            script_hash,
            read_only: true,
        }
    }

    pub fn as_read_only(&self) -> Self {
        Self {
            read_only: true,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_read_only_is_idempotent_and_non_mutating() {
        let ctx = StorageContext::new(Hash160([7; 20]));
        let ro = ctx.as_read_only();
        assert!(!ctx.read_only);
        assert!(ro.read_only);
        assert_eq!(ro.script_hash, ctx.script_hash);
        assert_eq!(ro.as_read_only(), ro);
    }
}
