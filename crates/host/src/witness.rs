// Path: crates/host/src/witness.rs
//! The authorization set a run is executed under.
//!
//! Witnesses are declared up front as script hashes; a check against a
//! compressed public key first derives the single-signature verification
//! script hash for that key. No signatures are verified here, only
//! membership.

use std::collections::BTreeSet;

use dryrun_types::error::{HashParseError, InteropError};
use dryrun_types::{hash160, Hash160};

use dryrun_vm::opcode;

#[derive(Debug, Clone, Default)]
pub struct WitnessSet {
    hashes: BTreeSet<Hash160>,
}

impl WitnessSet {
    pub fn new(hashes: impl IntoIterator<Item = Hash160>) -> Self {
        Self {
            hashes: hashes.into_iter().collect(),
        }
    }

    /// Parses a colon-separated list of big-endian hex script hashes.
    /// Empty segments are skipped, so "" is the empty set.
    pub fn parse(spec: &str) -> Result<Self, HashParseError> {
        let mut hashes = BTreeSet::new();
        for part in spec.split(':').filter(|p| !p.is_empty()) {
            hashes.insert(Hash160::from_hex(part)?);
        }
        Ok(Self { hashes })
    }

    pub fn contains(&self, hash: &Hash160) -> bool {
        self.hashes.contains(hash)
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Membership check for a script parameter that is either a 20-byte
    /// script hash or a 33-byte compressed public key. Any other length
    /// is a parameter error; a 33-byte value without a valid point tag
    /// is an invalid key.
    pub fn check(&self, param: &[u8]) -> Result<bool, InteropError> {
        let hash = match param.len() {
            Hash160::LEN => Hash160::from_bytes(param)
                .map_err(|_| InteropError::BadParameterLength(param.len()))?,
            33 => {
                if param[0] != 0x02 && param[0] != 0x03 {
                    return Err(InteropError::InvalidKey);
                }
                key_script_hash(param)
            }
            other => return Err(InteropError::BadParameterLength(other)),
        };
        Ok(self.contains(&hash))
    }
}

/// Script hash of the canonical single-signature verification script
/// for a compressed key: PUSHBYTES33, the key, CHECKSIG.
pub fn key_script_hash(key: &[u8]) -> Hash160 {
    let mut script = Vec::with_capacity(key.len() + 2);
    script.push(key.len() as u8);
    script.extend_from_slice(key);
    script.push(opcode::CHECKSIG);
    hash160(&script)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_key() -> Vec<u8> {
        let mut key = vec![0x02];
        key.extend_from_slice(&[0x11; 32]);
        key
    }

    #[test]
    fn parse_skips_empty_segments() {
        let set = WitnessSet::parse("").unwrap();
        assert!(set.is_empty());
        let set = WitnessSet::parse(&format!(":{}:", "ab".repeat(20))).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains(&Hash160([0xab; 20])));
    }

    #[test]
    fn raw_hash_membership() {
        let set = WitnessSet::new([Hash160([0x42; 20])]);
        assert!(set.check(&[0x42; 20]).unwrap());
        assert!(!set.check(&[0x43; 20]).unwrap());
    }

    #[test]
    fn key_resolves_through_verification_script() {
        let key = sample_key();
        let set = WitnessSet::new([key_script_hash(&key)]);
        assert!(set.check(&key).unwrap());
        // Same key against an empty set is a clean false, not an error.
        assert!(!WitnessSet::default().check(&key).unwrap());
    }

    #[test]
    fn bad_key_tag_is_invalid() {
        let mut key = sample_key();
        key[0] = 0x04;
        assert!(matches!(
            WitnessSet::default().check(&key),
            Err(InteropError::InvalidKey)
        ));
    }

    #[test]
    fn other_lengths_are_parameter_errors() {
        for len in [0usize, 19, 21, 32, 34] {
            assert!(matches!(
                WitnessSet::default().check(&vec![0x02; len]),
                Err(InteropError::BadParameterLength(l)) if l == len
            ));
        }
    }
}
