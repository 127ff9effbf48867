// Path: crates/vm/src/opcode.rs
//! Opcode constants for the chain's stack-machine instruction set.
//!
//! Only the values the harness prices or interprets are named; the gas
//! model treats everything at or below [`NOP`] as free and everything
//! unnamed as a one-unit default.

pub const PUSH0: u8 = 0x00;
/// 0x01..=0x4b push that many immediate bytes.
pub const PUSHBYTES75: u8 = 0x4b;
pub const PUSHDATA1: u8 = 0x4c;
pub const PUSHDATA2: u8 = 0x4d;
pub const PUSHDATA4: u8 = 0x4e;
pub const PUSHM1: u8 = 0x4f;
pub const PUSH1: u8 = 0x51;
pub const PUSH16: u8 = 0x60;

pub const NOP: u8 = 0x61;
pub const RET: u8 = 0x66;
pub const APPCALL: u8 = 0x67;
pub const SYSCALL: u8 = 0x68;
pub const TAILCALL: u8 = 0x69;

pub const DROP: u8 = 0x75;
pub const DUP: u8 = 0x76;
pub const SWAP: u8 = 0x7c;

pub const SHA1: u8 = 0xa7;
pub const SHA256: u8 = 0xa8;
pub const HASH160: u8 = 0xa9;
pub const HASH256: u8 = 0xaa;
pub const CHECKSIG: u8 = 0xac;
pub const VERIFY: u8 = 0xad;
pub const CHECKMULTISIG: u8 = 0xae;
