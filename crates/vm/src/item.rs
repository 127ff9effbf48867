// Path: crates/vm/src/item.rs
//! Stack item model shared between the interpreter and the host.

use std::cell::RefCell;
use std::rc::Rc;

use dryrun_types::error::InteropError;
use dryrun_types::{Block, Contract, Header, StorageContext, Transaction};
use dryrun_types::{TxAttribute, TxInput, TxOutput, TxWitness};

use crate::iterator::{Enumerator, KeyedIterator};

/// A host-domain object wrapped as an opaque VM value.
///
/// Chain objects are reference-counted because a script may duplicate a
/// handle many times; enumerator state additionally needs interior
/// mutability so that duplicated handles share a cursor.
#[derive(Debug, Clone)]
pub enum InteropValue {
    Block(Rc<Block>),
    Header(Rc<Header>),
    Transaction(Rc<Transaction>),
    Attribute(Rc<TxAttribute>),
    Input(Rc<TxInput>),
    Output(Rc<TxOutput>),
    Witness(Rc<TxWitness>),
    Contract(Rc<Contract>),
    StorageContext(StorageContext),
    Enumerator(Rc<RefCell<Enumerator>>),
    Iterator(Rc<RefCell<KeyedIterator>>),
}

impl InteropValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Block(_) => "Block",
            Self::Header(_) => "Header",
            Self::Transaction(_) => "Transaction",
            Self::Attribute(_) => "Attribute",
            Self::Input(_) => "Input",
            Self::Output(_) => "Output",
            Self::Witness(_) => "Witness",
            Self::Contract(_) => "Contract",
            Self::StorageContext(_) => "StorageContext",
            Self::Enumerator(_) => "Enumerator",
            Self::Iterator(_) => "Iterator",
        }
    }
}

/// A value on the evaluation stack.
#[derive(Debug, Clone)]
pub enum StackItem {
    ByteArray(Vec<u8>),
    Integer(i64),
    Bool(bool),
    Array(Vec<StackItem>),
    Struct(Vec<StackItem>),
    Map(Vec<(StackItem, StackItem)>),
    Interop(InteropValue),
}

impl StackItem {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::ByteArray(_) => "ByteArray",
            Self::Integer(_) => "Integer",
            Self::Bool(_) => "Boolean",
            Self::Array(_) => "Array",
            Self::Struct(_) => "Struct",
            Self::Map(_) => "Map",
            Self::Interop(v) => v.type_name(),
        }
    }

    /// Byte view of a primitive item. Compound and interop items have no
    /// byte form and fail the type contract.
    pub fn to_bytes(&self) -> Result<Vec<u8>, InteropError> {
        match self {
            Self::ByteArray(b) => Ok(b.clone()),
            Self::Integer(n) => Ok(int_to_bytes(*n)),
            Self::Bool(true) => Ok(vec![1]),
            Self::Bool(false) => Ok(Vec::new()),
            _ => Err(InteropError::WrongInteropType {
                expected: "ByteArray",
            }),
        }
    }

    /// Integer view of a primitive item.
    pub fn to_int(&self) -> Result<i64, InteropError> {
        match self {
            Self::Integer(n) => Ok(*n),
            Self::Bool(b) => Ok(*b as i64),
            Self::ByteArray(b) => bytes_to_int(b),
            _ => Err(InteropError::WrongInteropType { expected: "Integer" }),
        }
    }

    pub fn to_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Integer(n) => *n != 0,
            Self::ByteArray(b) => b.iter().any(|x| *x != 0),
            Self::Array(_) | Self::Struct(_) | Self::Map(_) | Self::Interop(_) => true,
        }
    }

    pub fn as_interop(&self) -> Option<&InteropValue> {
        match self {
            Self::Interop(v) => Some(v),
            _ => None,
        }
    }
}

impl From<&[u8]> for StackItem {
    fn from(bytes: &[u8]) -> Self {
        Self::ByteArray(bytes.to_vec())
    }
}

impl From<Vec<u8>> for StackItem {
    fn from(bytes: Vec<u8>) -> Self {
        Self::ByteArray(bytes)
    }
}

impl From<InteropValue> for StackItem {
    fn from(v: InteropValue) -> Self {
        Self::Interop(v)
    }
}

impl From<i64> for StackItem {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<bool> for StackItem {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Minimal little-endian two's-complement encoding, the chain's integer
/// byte form. Zero encodes as the empty string.
pub fn int_to_bytes(n: i64) -> Vec<u8> {
    if n == 0 {
        return Vec::new();
    }
    let mut bytes = n.to_le_bytes().to_vec();
    if n > 0 {
        while bytes.len() > 1 && bytes[bytes.len() - 1] == 0x00 {
            bytes.pop();
        }
        // Keep the sign bit clear for positive values.
        if bytes[bytes.len() - 1] & 0x80 != 0 {
            bytes.push(0x00);
        }
    } else {
        while bytes.len() > 1
            && bytes[bytes.len() - 1] == 0xff
            && bytes[bytes.len() - 2] & 0x80 != 0
        {
            bytes.pop();
        }
    }
    bytes
}

/// Inverse of [`int_to_bytes`]. Inputs wider than 8 bytes exceed the
/// harness's integer range and fail.
pub fn bytes_to_int(bytes: &[u8]) -> Result<i64, InteropError> {
    if bytes.is_empty() {
        return Ok(0);
    }
    if bytes.len() > 8 {
        return Err(InteropError::Codec(format!(
            "integer operand too wide: {} bytes",
            bytes.len()
        )));
    }
    let negative = bytes[bytes.len() - 1] & 0x80 != 0;
    let fill = if negative { 0xff } else { 0x00 };
    let mut raw = [fill; 8];
    raw[..bytes.len()].copy_from_slice(bytes);
    Ok(i64::from_le_bytes(raw))
}

/// The evaluation stack. Index 0 in `peek` is the top.
#[derive(Debug, Default)]
pub struct EvalStack {
    items: Vec<StackItem>,
}

impl EvalStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: impl Into<StackItem>) {
        self.items.push(item.into());
    }

    pub fn pop(&mut self) -> Result<StackItem, InteropError> {
        self.items.pop().ok_or(InteropError::StackUnderflow)
    }

    pub fn peek(&self, depth: usize) -> Result<&StackItem, InteropError> {
        if depth >= self.items.len() {
            return Err(InteropError::StackUnderflow);
        }
        Ok(&self.items[self.items.len() - 1 - depth])
    }

    pub fn swap_top(&mut self) -> Result<(), InteropError> {
        let len = self.items.len();
        if len < 2 {
            return Err(InteropError::StackUnderflow);
        }
        self.items.swap(len - 1, len - 2);
        Ok(())
    }

    /// Drains the stack into a top-first vector for result rendering.
    pub fn into_items(self) -> Vec<StackItem> {
        let mut items = self.items;
        items.reverse();
        items
    }

    pub fn items(&self) -> &[StackItem] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_byte_form_round_trips() {
        for n in [0i64, 1, -1, 127, 128, 255, 256, -128, -129, i64::MAX, i64::MIN] {
            let bytes = int_to_bytes(n);
            assert_eq!(bytes_to_int(&bytes).unwrap(), n, "n={n}");
        }
        assert!(int_to_bytes(0).is_empty());
        // 128 needs a sign byte: 0x80 0x00
        assert_eq!(int_to_bytes(128), vec![0x80, 0x00]);
        assert_eq!(int_to_bytes(-1), vec![0xff]);
    }

    #[test]
    fn wide_integer_operand_rejected() {
        assert!(bytes_to_int(&[0u8; 9]).is_err());
    }

    #[test]
    fn peek_is_top_relative() {
        let mut stack = EvalStack::new();
        stack.push(1i64);
        stack.push(2i64);
        assert_eq!(stack.peek(0).unwrap().to_int().unwrap(), 2);
        assert_eq!(stack.peek(1).unwrap().to_int().unwrap(), 1);
        assert!(stack.peek(2).is_err());
    }

    #[test]
    fn bool_byte_forms() {
        assert_eq!(StackItem::Bool(true).to_bytes().unwrap(), vec![1]);
        assert!(StackItem::Bool(false).to_bytes().unwrap().is_empty());
        assert!(StackItem::Array(vec![]).to_bytes().is_err());
    }
}
