// Path: crates/types/src/error/mod.rs
//! Error tiers for the dryrun harness.
//!
//! Two tiers exist at runtime: process-fatal startup errors (handled with
//! `anyhow` at the binary boundary) and script faults, which are the enums
//! below. A script fault ends the run in a FAULT state but never aborts
//! the host process.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors from parsing fixed-size hash inputs.
#[derive(Debug, Error)]
pub enum HashParseError {
    /// The input had the wrong byte length for this hash type.
    #[error("Invalid hash length: expected {expected}, got {got}")]
    BadLength {
        /// The expected length in bytes.
        expected: usize,
        /// The actual length in bytes.
        got: usize,
    },
    /// The input was not valid hex.
    #[error("Invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

impl ErrorCode for HashParseError {
    fn code(&self) -> &'static str {
        match self {
            Self::BadLength { .. } => "HASH_BAD_LENGTH",
            Self::Hex(_) => "HASH_BAD_HEX",
        }
    }
}

/// Errors raised while decoding the chain's canonical binary layouts.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The buffer ended before the expected field.
    #[error("Unexpected end of input at offset {0}")]
    UnexpectedEof(usize),
    /// A variable-length prefix exceeded the sanity bound.
    #[error("Length prefix too large: {0}")]
    OversizedLength(u64),
    /// A string field was not valid UTF-8.
    #[error("Invalid UTF-8 in string field")]
    InvalidUtf8,
    /// A discriminant byte did not match any known variant.
    #[error("Unknown {kind} discriminant: {value:#04x}")]
    UnknownDiscriminant {
        /// What was being decoded (transaction kind, attribute usage, ...).
        kind: &'static str,
        /// The unrecognized byte.
        value: u8,
    },
    /// Trailing bytes remained after a complete decode.
    #[error("Trailing bytes after decode: {0} left")]
    TrailingBytes(usize),
}

impl ErrorCode for DecodeError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnexpectedEof(_) => "DECODE_UNEXPECTED_EOF",
            Self::OversizedLength(_) => "DECODE_OVERSIZED_LENGTH",
            Self::InvalidUtf8 => "DECODE_INVALID_UTF8",
            Self::UnknownDiscriminant { .. } => "DECODE_UNKNOWN_DISCRIMINANT",
            Self::TrailingBytes(_) => "DECODE_TRAILING_BYTES",
        }
    }
}

/// Errors from the remote chain-state adapter.
///
/// One failure is terminal for the query that triggered it; no retries
/// are performed anywhere.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The transport failed (connection refused, timeout, non-success status).
    #[error("Remote node unavailable: {0}")]
    RemoteUnavailable(String),
    /// The response arrived but could not be interpreted: missing or
    /// ill-typed field, undecodable hex, or a truncated binary payload.
    #[error("Malformed remote response: {0}")]
    MalformedResponse(String),
}

impl ErrorCode for ChainError {
    fn code(&self) -> &'static str {
        match self {
            Self::RemoteUnavailable(_) => "CHAIN_REMOTE_UNAVAILABLE",
            Self::MalformedResponse(_) => "CHAIN_MALFORMED_RESPONSE",
        }
    }
}

impl From<DecodeError> for ChainError {
    fn from(e: DecodeError) -> Self {
        ChainError::MalformedResponse(e.to_string())
    }
}

/// Errors raised inside a syscall handler.
///
/// All of these are script faults: they are returned to the VM engine and
/// end the run in a FAULT state with gas consumed reported.
#[derive(Debug, Error)]
pub enum InteropError {
    /// A popped stack value did not have the expected domain type.
    #[error("Wrong interop type: expected {expected}")]
    WrongInteropType {
        /// The domain type the handler required.
        expected: &'static str,
    },
    /// A parameter had a length that is neither of the accepted forms.
    #[error("Bad parameter length: {0}")]
    BadParameterLength(usize),
    /// A 33-byte parameter was not a validly tagged compressed key.
    #[error("Parameter is neither a script hash nor a valid compressed key")]
    InvalidKey,
    /// A mutating storage operation was attempted through a read-only context.
    #[error("Storage context is read only")]
    ReadOnlyViolation,
    /// A collection index was out of range.
    #[error("Index {index} out of range for collection of length {len}")]
    IndexOutOfRange {
        /// The requested index.
        index: i64,
        /// The collection length.
        len: usize,
    },
    /// A collection result would exceed the VM's array size cap.
    #[error("Too many items for a VM array: {0}")]
    TooManyItems(usize),
    /// A numeric operand used as a block index was negative or above u32.
    #[error("Bad block index: {0}")]
    BadBlockIndex(i64),
    /// A handler popped more operands than the stack holds.
    #[error("Operand stack underflow")]
    StackUnderflow,
    /// Item (de)serialization through the VM's canonical codec failed.
    #[error("Item codec error: {0}")]
    Codec(String),
    /// A remote query issued by the handler failed.
    #[error("Chain adapter error: {0}")]
    Chain(#[from] ChainError),
}

impl ErrorCode for InteropError {
    fn code(&self) -> &'static str {
        match self {
            Self::WrongInteropType { .. } => "INTEROP_WRONG_TYPE",
            Self::BadParameterLength(_) => "INTEROP_BAD_PARAMETER_LENGTH",
            Self::InvalidKey => "INTEROP_INVALID_KEY",
            Self::ReadOnlyViolation => "INTEROP_READ_ONLY_VIOLATION",
            Self::IndexOutOfRange { .. } => "INTEROP_INDEX_OUT_OF_RANGE",
            Self::TooManyItems(_) => "INTEROP_TOO_MANY_ITEMS",
            Self::BadBlockIndex(_) => "INTEROP_BAD_BLOCK_INDEX",
            Self::StackUnderflow => "INTEROP_STACK_UNDERFLOW",
            Self::Codec(_) => "INTEROP_CODEC_ERROR",
            Self::Chain(_) => "INTEROP_CHAIN_ERROR",
        }
    }
}

/// Errors from the VM engine boundary.
#[derive(Debug, Error)]
pub enum VmError {
    /// The script ended inside an opcode immediate.
    #[error("Bad script: {0}")]
    BadScript(String),
    /// An opcode outside the interpreter's supported set was decoded.
    #[error("Unsupported opcode: {0:#04x}")]
    UnsupportedOpcode(u8),
    /// A syscall identifier had no registry entry.
    #[error("Unknown syscall id: {0:#010x}")]
    UnknownSyscall(u32),
    /// The gas budget was exhausted.
    #[error("Gas limit exceeded")]
    OutOfGas,
    /// An opcode needed more operands than the stack holds.
    #[error("Evaluation stack underflow")]
    StackUnderflow,
    /// The invocation stack exceeded its depth cap.
    #[error("Call depth limit exceeded")]
    CallDepthExceeded,
    /// A syscall handler returned a fault.
    #[error("Syscall fault: {0}")]
    Syscall(#[from] InteropError),
    /// A contract-code lookup through the host hook failed.
    #[error("Contract lookup failed: {0}")]
    ContractLookup(String),
}

impl ErrorCode for VmError {
    fn code(&self) -> &'static str {
        match self {
            Self::BadScript(_) => "VM_BAD_SCRIPT",
            Self::UnsupportedOpcode(_) => "VM_UNSUPPORTED_OPCODE",
            Self::UnknownSyscall(_) => "VM_UNKNOWN_SYSCALL",
            Self::OutOfGas => "VM_OUT_OF_GAS",
            Self::StackUnderflow => "VM_STACK_UNDERFLOW",
            Self::CallDepthExceeded => "VM_CALL_DEPTH_EXCEEDED",
            Self::Syscall(_) => "VM_SYSCALL_FAULT",
            Self::ContractLookup(_) => "VM_CONTRACT_LOOKUP_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(
            ChainError::RemoteUnavailable("x".into()).code(),
            "CHAIN_REMOTE_UNAVAILABLE"
        );
        assert_eq!(InteropError::ReadOnlyViolation.code(), "INTEROP_READ_ONLY_VIOLATION");
        assert_eq!(VmError::OutOfGas.code(), "VM_OUT_OF_GAS");
    }

    #[test]
    fn chain_errors_convert_into_interop_faults() {
        let e: InteropError = ChainError::MalformedResponse("short".into()).into();
        assert_eq!(e.code(), "INTEROP_CHAIN_ERROR");
    }
}
