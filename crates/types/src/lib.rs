// Path: crates/types/src/lib.rs
#![cfg_attr(
    not(test),
    deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)
)]

//! Core data structures and error types for the dryrun harness.
//!
//! Everything here is chain-shaped but network-agnostic: fixed-size hashes,
//! the binary layouts of blocks/headers/transactions/contract records, and
//! the error tiers shared by the adapter, the interop layer and the VM
//! boundary. Higher crates depend on this one and never the other way
//! around.

pub mod chain;
pub mod error;
pub mod hash;
pub mod storage;

pub use chain::{
    Block, Contract, ContractProperties, Header, Transaction, TxAttribute, TxInput, TxKind,
    TxOutput, TxPayload, TxWitness,
};
pub use hash::{hash160, sha256, Hash160, Hash256};
pub use storage::StorageContext;
