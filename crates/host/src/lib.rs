// Path: crates/host/src/lib.rs
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used, clippy::panic))]
//! The host environment a script executes against.
//!
//! This crate assembles the pieces the VM boundary leaves open: the gas
//! price model, the local storage overlay, the witness set, the syscall
//! registry with its handlers, and the execution driver that wires them
//! into one run against a pinned chain height.

pub mod context;
pub mod driver;
pub mod gas;
pub mod interop;
pub mod storage;
pub mod witness;

pub use context::{RunContext, SyscallCtx};
pub use driver::{RunReport, Runner};
pub use interop::InteropRegistry;
pub use storage::StorageOverlay;
pub use witness::WitnessSet;
