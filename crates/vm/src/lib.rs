// Path: crates/vm/src/lib.rs
#![cfg_attr(
    not(test),
    deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)
)]

//! The VM-engine boundary of the dryrun harness.
//!
//! The production engine is an external collaborator; this crate pins
//! down the contracts the host environment exposes to it — the stack
//! item model, the canonical item codec, and the three host callbacks
//! (contract-code lookup, gas pricing, syscall dispatch) — plus a small
//! reference interpreter that covers push/flow/call/syscall opcodes.
//! That subset is enough to dry-run invocation scripts end to end; it is
//! not an opcode-complete VM and does not try to be.

pub mod codec;
pub mod engine;
pub mod item;
pub mod iterator;
pub mod opcode;

pub use engine::{
    syscall_id, CallStack, Engine, ExecutionResult, HostInterface, VmState, MAX_ARRAY_SIZE,
};
pub use item::{EvalStack, InteropValue, StackItem};
pub use iterator::{Enumerator, KeyedIterator};

use dryrun_types::sha256;

/// Derives the stable numeric identifier of a syscall from its name:
/// the first four bytes of SHA-256 over the name, little-endian.
pub fn interop_id(name: &[u8]) -> u32 {
    let digest = sha256(name);
    u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
}
