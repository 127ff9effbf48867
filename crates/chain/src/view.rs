// Path: crates/chain/src/view.rs
//! The read-only view of remote chain state the harness executes against.

use dryrun_types::error::ChainError;
use dryrun_types::{Block, Contract, Hash160, Hash256, Header, Transaction};

/// Read-only chain-state queries.
///
/// Height-pinned methods take the pinned height explicitly so that one
/// client can serve queries for any snapshot. A missing record is a
/// [`ChainError::MalformedResponse`]: the node answers these methods
/// with the record or an error, never with an empty success.
pub trait ChainView {
    /// Number of blocks the node knows about. The harness pins its
    /// execution height to `count - 1` at startup.
    fn block_count(&self) -> Result<u64, ChainError>;

    fn block_by_hash(&self, hash: &Hash256) -> Result<Block, ChainError>;

    fn header_by_hash(&self, hash: &Hash256) -> Result<Header, ChainError>;

    fn header_by_height(&self, height: u32) -> Result<Header, ChainError>;

    /// Block hash at the given height.
    fn hash_by_height(&self, height: u32) -> Result<Hash256, ChainError>;

    /// Contract state as of the given height.
    fn contract_at(&self, hash: &Hash160, height: u32) -> Result<Contract, ChainError>;

    /// Raw storage value under a flat database key as of the given
    /// height. The key is hex of the owning script hash followed by hex
    /// of the storage key.
    fn storage_at(&self, db_key: &str, height: u32) -> Result<Vec<u8>, ChainError>;

    fn transaction_by_hash(&self, hash: &Hash256) -> Result<Transaction, ChainError>;
}
