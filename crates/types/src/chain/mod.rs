// Path: crates/types/src/chain/mod.rs
//! Chain primitives and their canonical binary layouts.
//!
//! These are the domain objects the remote node ships as hex-encoded
//! binary: block headers, blocks, transactions and contract records.
//! Decoding reconstructs the exact field layout the VM's syscalls
//! expect; any truncation or unknown discriminant is a decode error that
//! the adapter reports as a malformed response.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::hash::{double_sha256, hash160, Hash160, Hash256};

pub mod io;

use io::{BinReader, BinWriter};

bitflags! {
    /// Declared capability bits of a deployed contract.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ContractProperties: u8 {
        const HAS_STORAGE = 0x01;
        const HAS_DYNAMIC_INVOKE = 0x02;
        const PAYABLE = 0x04;
    }
}

/// A deployed contract record: code plus declared interface and metadata.
///
/// Owned only for the duration of the syscall that fetched it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub script: Vec<u8>,
    /// Declared parameter types, one tag byte per parameter.
    pub parameters: Vec<u8>,
    pub return_type: u8,
    pub properties: ContractProperties,
    pub name: String,
    pub code_version: String,
    pub author: String,
    pub email: String,
    pub description: String,
}

impl Contract {
    pub fn script_hash(&self) -> Hash160 {
        hash160(&self.script)
    }

    pub fn has_storage(&self) -> bool {
        self.properties.contains(ContractProperties::HAS_STORAGE)
    }

    pub fn has_dynamic_invoke(&self) -> bool {
        self.properties.contains(ContractProperties::HAS_DYNAMIC_INVOKE)
    }

    pub fn is_payable(&self) -> bool {
        self.properties.contains(ContractProperties::PAYABLE)
    }

    pub fn decode(r: &mut BinReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            script: r.read_var_bytes()?,
            parameters: r.read_var_bytes()?,
            return_type: r.read_u8()?,
            properties: ContractProperties::from_bits_truncate(r.read_u8()?),
            name: r.read_var_string()?,
            code_version: r.read_var_string()?,
            author: r.read_var_string()?,
            email: r.read_var_string()?,
            description: r.read_var_string()?,
        })
    }

    pub fn encode(&self, w: &mut BinWriter) {
        w.write_var_bytes(&self.script);
        w.write_var_bytes(&self.parameters);
        w.write_u8(self.return_type);
        w.write_u8(self.properties.bits());
        w.write_var_string(&self.name);
        w.write_var_string(&self.code_version);
        w.write_var_string(&self.author);
        w.write_var_string(&self.email);
        w.write_var_string(&self.description);
    }
}

/// An invocation/verification script pair attached to a transaction or block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TxWitness {
    pub invocation: Vec<u8>,
    pub verification: Vec<u8>,
}

impl TxWitness {
    fn decode(r: &mut BinReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            invocation: r.read_var_bytes()?,
            verification: r.read_var_bytes()?,
        })
    }

    fn encode(&self, w: &mut BinWriter) {
        w.write_var_bytes(&self.invocation);
        w.write_var_bytes(&self.verification);
    }
}

/// Block header. `consensus_data` is the leader's nonce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub version: u32,
    pub prev_hash: Hash256,
    pub merkle_root: Hash256,
    pub timestamp: u32,
    pub index: u32,
    pub consensus_data: u64,
    pub next_consensus: Hash160,
    pub witness: TxWitness,
}

impl Header {
    /// Hash of the consensus-relevant fields (everything before the witness).
    pub fn hash(&self) -> Hash256 {
        let mut w = BinWriter::new();
        self.encode_hashable(&mut w);
        double_sha256(&w.into_bytes())
    }

    fn encode_hashable(&self, w: &mut BinWriter) {
        w.write_u32(self.version);
        w.write_bytes(self.prev_hash.as_bytes());
        w.write_bytes(self.merkle_root.as_bytes());
        w.write_u32(self.timestamp);
        w.write_u32(self.index);
        w.write_u64(self.consensus_data);
        w.write_bytes(self.next_consensus.as_bytes());
    }

    /// The shared base of headers and blocks: hashable fields, a 0x01
    /// padding byte, then the consensus witness.
    fn decode_base(r: &mut BinReader<'_>) -> Result<Self, DecodeError> {
        let header = Self {
            version: r.read_u32()?,
            prev_hash: Hash256::from_bytes(r.read_bytes(32)?)
                .map_err(|_| DecodeError::UnexpectedEof(0))?,
            merkle_root: Hash256::from_bytes(r.read_bytes(32)?)
                .map_err(|_| DecodeError::UnexpectedEof(0))?,
            timestamp: r.read_u32()?,
            index: r.read_u32()?,
            consensus_data: r.read_u64()?,
            next_consensus: Hash160::from_bytes(r.read_bytes(20)?)
                .map_err(|_| DecodeError::UnexpectedEof(0))?,
            witness: TxWitness::default(),
        };
        let pad = r.read_u8()?;
        if pad != 0x01 {
            return Err(DecodeError::UnknownDiscriminant {
                kind: "header padding",
                value: pad,
            });
        }
        let witness = TxWitness::decode(r)?;
        Ok(Self { witness, ..header })
    }

    /// A standalone header is the base followed by a 0x00 terminator.
    pub fn decode(r: &mut BinReader<'_>) -> Result<Self, DecodeError> {
        let header = Self::decode_base(r)?;
        let terminator = r.read_u8()?;
        if terminator != 0x00 {
            return Err(DecodeError::UnknownDiscriminant {
                kind: "header terminator",
                value: terminator,
            });
        }
        Ok(header)
    }

    fn encode_base(&self, w: &mut BinWriter) {
        self.encode_hashable(w);
        w.write_u8(0x01);
        self.witness.encode(w);
    }

    pub fn encode(&self, w: &mut BinWriter) {
        self.encode_base(w);
        w.write_u8(0x00);
    }
}

/// A full block: header base plus the transaction list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: Header,
    pub transactions: Vec<Transaction>,
}

impl Block {
    pub fn hash(&self) -> Hash256 {
        self.header.hash()
    }

    pub fn decode(r: &mut BinReader<'_>) -> Result<Self, DecodeError> {
        let header = Header::decode_base(r)?;
        let count = r.read_var_int()? as usize;
        let mut transactions = Vec::with_capacity(count);
        for _ in 0..count {
            transactions.push(Transaction::decode(r)?);
        }
        Ok(Self {
            header,
            transactions,
        })
    }

    pub fn encode(&self, w: &mut BinWriter) {
        self.header.encode_base(w);
        w.write_var_int(self.transactions.len() as u64);
        for tx in &self.transactions {
            tx.encode(w);
        }
    }
}

/// Transaction discriminant byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxKind {
    Miner,
    Claim,
    Contract,
    Invocation,
}

impl TxKind {
    pub fn byte(self) -> u8 {
        match self {
            Self::Miner => 0x00,
            Self::Claim => 0x02,
            Self::Contract => 0x80,
            Self::Invocation => 0xd1,
        }
    }

    pub fn from_byte(b: u8) -> Result<Self, DecodeError> {
        match b {
            0x00 => Ok(Self::Miner),
            0x02 => Ok(Self::Claim),
            0x80 => Ok(Self::Contract),
            0xd1 => Ok(Self::Invocation),
            other => Err(DecodeError::UnknownDiscriminant {
                kind: "transaction kind",
                value: other,
            }),
        }
    }
}

/// Kind-specific exclusive data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxPayload {
    Miner { nonce: u32 },
    Claim { claims: Vec<TxInput> },
    Contract,
    Invocation { script: Vec<u8>, gas: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxAttribute {
    pub usage: u8,
    pub data: Vec<u8>,
}

impl TxAttribute {
    /// Attribute data length is dictated by the usage byte; only the
    /// description/remark family carries its own length prefix.
    fn decode(r: &mut BinReader<'_>) -> Result<Self, DecodeError> {
        let usage = r.read_u8()?;
        let data = match usage {
            // ContractHash, ECDH02/03, Vote, Hash1..Hash15
            0x00 | 0x02 | 0x03 | 0x30 | 0xa1..=0xaf => r.read_bytes(32)?.to_vec(),
            // Script
            0x20 => r.read_bytes(20)?.to_vec(),
            // DescriptionUrl: single length byte
            0x81 => {
                let len = r.read_u8()? as usize;
                r.read_bytes(len)?.to_vec()
            }
            // Description, Remark..Remark15
            0x90 | 0xf0..=0xff => r.read_var_bytes()?,
            other => {
                return Err(DecodeError::UnknownDiscriminant {
                    kind: "attribute usage",
                    value: other,
                })
            }
        };
        Ok(Self { usage, data })
    }

    fn encode(&self, w: &mut BinWriter) {
        w.write_u8(self.usage);
        match self.usage {
            0x00 | 0x02 | 0x03 | 0x30 | 0xa1..=0xaf | 0x20 => w.write_bytes(&self.data),
            0x81 => {
                w.write_u8(self.data.len() as u8);
                w.write_bytes(&self.data);
            }
            _ => w.write_var_bytes(&self.data),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    pub prev_hash: Hash256,
    pub prev_index: u16,
}

impl TxInput {
    fn decode(r: &mut BinReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            prev_hash: Hash256::from_bytes(r.read_bytes(32)?)
                .map_err(|_| DecodeError::UnexpectedEof(0))?,
            prev_index: r.read_u16()?,
        })
    }

    fn encode(&self, w: &mut BinWriter) {
        w.write_bytes(self.prev_hash.as_bytes());
        w.write_u16(self.prev_index);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    pub asset_id: Hash256,
    /// Fixed-point amount, 8 decimals.
    pub value: i64,
    pub script_hash: Hash160,
}

impl TxOutput {
    fn decode(r: &mut BinReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            asset_id: Hash256::from_bytes(r.read_bytes(32)?)
                .map_err(|_| DecodeError::UnexpectedEof(0))?,
            value: r.read_i64()?,
            script_hash: Hash160::from_bytes(r.read_bytes(20)?)
                .map_err(|_| DecodeError::UnexpectedEof(0))?,
        })
    }

    fn encode(&self, w: &mut BinWriter) {
        w.write_bytes(self.asset_id.as_bytes());
        w.write_i64(self.value);
        w.write_bytes(self.script_hash.as_bytes());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub kind: TxKind,
    pub version: u8,
    pub payload: TxPayload,
    pub attributes: Vec<TxAttribute>,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub witnesses: Vec<TxWitness>,
}

impl Transaction {
    /// Hash of the unsigned encoding (witnesses excluded).
    pub fn hash(&self) -> Hash256 {
        let mut w = BinWriter::new();
        self.encode_unsigned(&mut w);
        double_sha256(&w.into_bytes())
    }

    /// Convenience accessor for the invocation script, if any.
    pub fn invocation_script(&self) -> Option<&[u8]> {
        match &self.payload {
            TxPayload::Invocation { script, .. } => Some(script),
            _ => None,
        }
    }

    pub fn decode(r: &mut BinReader<'_>) -> Result<Self, DecodeError> {
        let kind = TxKind::from_byte(r.read_u8()?)?;
        let version = r.read_u8()?;
        let payload = match kind {
            TxKind::Miner => TxPayload::Miner {
                nonce: r.read_u32()?,
            },
            TxKind::Claim => {
                let count = r.read_var_int()? as usize;
                let mut claims = Vec::with_capacity(count);
                for _ in 0..count {
                    claims.push(TxInput::decode(r)?);
                }
                TxPayload::Claim { claims }
            }
            TxKind::Contract => TxPayload::Contract,
            TxKind::Invocation => {
                let script = r.read_var_bytes()?;
                let gas = if version >= 1 { r.read_i64()? } else { 0 };
                TxPayload::Invocation { script, gas }
            }
        };

        let attr_count = r.read_var_int()? as usize;
        let mut attributes = Vec::with_capacity(attr_count);
        for _ in 0..attr_count {
            attributes.push(TxAttribute::decode(r)?);
        }
        let input_count = r.read_var_int()? as usize;
        let mut inputs = Vec::with_capacity(input_count);
        for _ in 0..input_count {
            inputs.push(TxInput::decode(r)?);
        }
        let output_count = r.read_var_int()? as usize;
        let mut outputs = Vec::with_capacity(output_count);
        for _ in 0..output_count {
            outputs.push(TxOutput::decode(r)?);
        }
        let witness_count = r.read_var_int()? as usize;
        let mut witnesses = Vec::with_capacity(witness_count);
        for _ in 0..witness_count {
            witnesses.push(TxWitness::decode(r)?);
        }

        Ok(Self {
            kind,
            version,
            payload,
            attributes,
            inputs,
            outputs,
            witnesses,
        })
    }

    fn encode_unsigned(&self, w: &mut BinWriter) {
        w.write_u8(self.kind.byte());
        w.write_u8(self.version);
        match &self.payload {
            TxPayload::Miner { nonce } => w.write_u32(*nonce),
            TxPayload::Claim { claims } => {
                w.write_var_int(claims.len() as u64);
                for claim in claims {
                    claim.encode(w);
                }
            }
            TxPayload::Contract => {}
            TxPayload::Invocation { script, gas } => {
                w.write_var_bytes(script);
                if self.version >= 1 {
                    w.write_i64(*gas);
                }
            }
        }
        w.write_var_int(self.attributes.len() as u64);
        for attr in &self.attributes {
            attr.encode(w);
        }
        w.write_var_int(self.inputs.len() as u64);
        for input in &self.inputs {
            input.encode(w);
        }
        w.write_var_int(self.outputs.len() as u64);
        for output in &self.outputs {
            output.encode(w);
        }
    }

    pub fn encode(&self, w: &mut BinWriter) {
        self.encode_unsigned(w);
        w.write_var_int(self.witnesses.len() as u64);
        for witness in &self.witnesses {
            witness.encode(w);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> Header {
        Header {
            version: 0,
            prev_hash: Hash256([0x11; 32]),
            merkle_root: Hash256([0x22; 32]),
            timestamp: 1_468_595_301,
            index: 42,
            consensus_data: 0xdead_beef,
            next_consensus: Hash160([0x33; 20]),
            witness: TxWitness {
                invocation: vec![0x01, 0x02],
                verification: vec![0x03],
            },
        }
    }

    fn sample_invocation_tx() -> Transaction {
        Transaction {
            kind: TxKind::Invocation,
            version: 1,
            payload: TxPayload::Invocation {
                script: vec![0x51, 0x52],
                gas: 0,
            },
            attributes: vec![TxAttribute {
                usage: 0xf0,
                data: b"remark".to_vec(),
            }],
            inputs: vec![TxInput {
                prev_hash: Hash256([0x44; 32]),
                prev_index: 1,
            }],
            outputs: vec![TxOutput {
                asset_id: Hash256([0x55; 32]),
                value: 100_000_000,
                script_hash: Hash160([0x66; 20]),
            }],
            witnesses: vec![],
        }
    }

    #[test]
    fn header_decode_requires_padding_bytes() {
        let header = sample_header();
        let mut w = BinWriter::new();
        header.encode(&mut w);
        let mut bytes = w.into_bytes();

        let mut r = BinReader::new(&bytes);
        let decoded = Header::decode(&mut r).unwrap();
        r.finish().unwrap();
        assert_eq!(decoded, header);

        // Corrupt the 0x01 pad between hashable fields and witness.
        bytes[104] = 0x07;
        let mut r = BinReader::new(&bytes);
        assert!(matches!(
            Header::decode(&mut r),
            Err(DecodeError::UnknownDiscriminant { kind: "header padding", .. })
        ));
    }

    #[test]
    fn block_decode_carries_transactions() {
        let block = Block {
            header: sample_header(),
            transactions: vec![sample_invocation_tx()],
        };
        let mut w = BinWriter::new();
        block.encode(&mut w);
        let bytes = w.into_bytes();

        let mut r = BinReader::new(&bytes);
        let decoded = Block::decode(&mut r).unwrap();
        r.finish().unwrap();
        assert_eq!(decoded.transactions.len(), 1);
        assert_eq!(decoded.header.index, 42);
        assert_eq!(
            decoded.transactions[0].invocation_script(),
            Some(&[0x51, 0x52][..])
        );
    }

    #[test]
    fn header_hash_ignores_witness() {
        let a = sample_header();
        let mut b = a.clone();
        b.witness.invocation = vec![0xff; 16];
        assert_eq!(a.hash(), b.hash());
        let mut c = a.clone();
        c.index += 1;
        assert_ne!(a.hash(), c.hash());
    }

    #[test]
    fn tx_hash_ignores_witnesses() {
        let a = sample_invocation_tx();
        let mut b = a.clone();
        b.witnesses.push(TxWitness {
            invocation: vec![0x01],
            verification: vec![0x02],
        });
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn unknown_tx_kind_is_a_decode_error() {
        let mut r = BinReader::new(&[0x42, 0x00]);
        assert!(matches!(
            Transaction::decode(&mut r),
            Err(DecodeError::UnknownDiscriminant { kind: "transaction kind", .. })
        ));
    }

    #[test]
    fn contract_record_round_trip() {
        let contract = Contract {
            script: vec![0x00, 0x51],
            parameters: vec![0x07, 0x10],
            return_type: 0x05,
            properties: ContractProperties::HAS_STORAGE | ContractProperties::PAYABLE,
            name: "token".into(),
            code_version: "1.0".into(),
            author: "dev".into(),
            email: "dev@example.org".into(),
            description: "".into(),
        };
        let mut w = BinWriter::new();
        contract.encode(&mut w);
        let bytes = w.into_bytes();
        let mut r = BinReader::new(&bytes);
        let decoded = Contract::decode(&mut r).unwrap();
        r.finish().unwrap();
        assert!(decoded.has_storage());
        assert!(!decoded.has_dynamic_invoke());
        assert!(decoded.is_payable());
        assert_eq!(decoded, contract);
    }
}
