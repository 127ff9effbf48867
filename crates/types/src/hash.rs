// Path: crates/types/src/hash.rs
//! Fixed-size identifiers used as addresses on the chain.
//!
//! Both hash types store their bytes in big-endian order and render as
//! big-endian hex everywhere, including remote-query parameters. The
//! captured history of this tool mixed big- and little-endian string
//! forms per call site; one canonical order is used here instead.

use ripemd::Ripemd160;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::HashParseError;

/// 160-bit script hash identifying a contract or account.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hash160(pub [u8; 20]);

/// 256-bit block or transaction hash.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hash256(pub [u8; 32]);

macro_rules! impl_hash {
    ($name:ident, $len:expr) => {
        impl $name {
            pub const LEN: usize = $len;

            pub fn from_bytes(bytes: &[u8]) -> Result<Self, HashParseError> {
                if bytes.len() != $len {
                    return Err(HashParseError::BadLength {
                        expected: $len,
                        got: bytes.len(),
                    });
                }
                let mut out = [0u8; $len];
                out.copy_from_slice(bytes);
                Ok(Self(out))
            }

            pub fn from_hex(s: &str) -> Result<Self, HashParseError> {
                let raw = hex::decode(s.trim_start_matches("0x"))?;
                Self::from_bytes(&raw)
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.to_hex())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

impl_hash!(Hash160, 20);
impl_hash!(Hash256, 32);

/// Single SHA-256 digest.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 applied twice, the chain's block/transaction hash function.
pub fn double_sha256(data: &[u8]) -> Hash256 {
    Hash256(sha256(&sha256(data)))
}

/// RIPEMD-160 over SHA-256, the chain's script-hash function.
pub fn hash160(data: &[u8]) -> Hash160 {
    let mut hasher = Ripemd160::new();
    hasher.update(sha256(data));
    Hash160(hasher.finalize().into())
}
