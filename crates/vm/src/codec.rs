// Path: crates/vm/src/codec.rs
//! Canonical binary codec for stack items.
//!
//! This is the format the `Runtime.Serialize`/`Runtime.Deserialize`
//! syscalls expose to scripts: a type tag followed by the payload.
//! Interop handles reference host state and have no serialized form.

use dryrun_types::chain::io::{BinReader, BinWriter};
use dryrun_types::error::InteropError;

use crate::item::{bytes_to_int, int_to_bytes, StackItem};

const TAG_BYTE_ARRAY: u8 = 0x00;
const TAG_BOOL: u8 = 0x01;
const TAG_INTEGER: u8 = 0x02;
const TAG_ARRAY: u8 = 0x80;
const TAG_STRUCT: u8 = 0x81;
const TAG_MAP: u8 = 0x82;

/// Cap on nested containers, to bound recursion on hostile payloads.
const MAX_DEPTH: usize = 16;

pub fn serialize(item: &StackItem) -> Result<Vec<u8>, InteropError> {
    let mut w = BinWriter::new();
    write_item(item, &mut w, 0)?;
    Ok(w.into_bytes())
}

pub fn deserialize(bytes: &[u8]) -> Result<StackItem, InteropError> {
    let mut r = BinReader::new(bytes);
    let item = read_item(&mut r, 0)?;
    r.finish()
        .map_err(|e| InteropError::Codec(e.to_string()))?;
    Ok(item)
}

fn write_item(item: &StackItem, w: &mut BinWriter, depth: usize) -> Result<(), InteropError> {
    if depth > MAX_DEPTH {
        return Err(InteropError::Codec("item nesting too deep".into()));
    }
    match item {
        StackItem::ByteArray(b) => {
            w.write_u8(TAG_BYTE_ARRAY);
            w.write_var_bytes(b);
        }
        StackItem::Bool(b) => {
            w.write_u8(TAG_BOOL);
            w.write_u8(*b as u8);
        }
        StackItem::Integer(n) => {
            w.write_u8(TAG_INTEGER);
            w.write_var_bytes(&int_to_bytes(*n));
        }
        StackItem::Array(items) | StackItem::Struct(items) => {
            w.write_u8(if matches!(item, StackItem::Array(_)) {
                TAG_ARRAY
            } else {
                TAG_STRUCT
            });
            w.write_var_int(items.len() as u64);
            for inner in items {
                write_item(inner, w, depth + 1)?;
            }
        }
        StackItem::Map(entries) => {
            w.write_u8(TAG_MAP);
            w.write_var_int(entries.len() as u64);
            for (key, value) in entries {
                write_item(key, w, depth + 1)?;
                write_item(value, w, depth + 1)?;
            }
        }
        StackItem::Interop(v) => {
            return Err(InteropError::Codec(format!(
                "interop item {} is not serializable",
                v.type_name()
            )));
        }
    }
    Ok(())
}

fn read_item(r: &mut BinReader<'_>, depth: usize) -> Result<StackItem, InteropError> {
    if depth > MAX_DEPTH {
        return Err(InteropError::Codec("item nesting too deep".into()));
    }
    let codec_err = |e: dryrun_types::error::DecodeError| InteropError::Codec(e.to_string());
    let tag = r.read_u8().map_err(codec_err)?;
    match tag {
        TAG_BYTE_ARRAY => Ok(StackItem::ByteArray(r.read_var_bytes().map_err(codec_err)?)),
        TAG_BOOL => Ok(StackItem::Bool(r.read_u8().map_err(codec_err)? != 0)),
        TAG_INTEGER => {
            let raw = r.read_var_bytes().map_err(codec_err)?;
            Ok(StackItem::Integer(bytes_to_int(&raw)?))
        }
        TAG_ARRAY | TAG_STRUCT => {
            let count = r.read_var_int().map_err(codec_err)? as usize;
            let mut items = Vec::with_capacity(count.min(1024));
            for _ in 0..count {
                items.push(read_item(r, depth + 1)?);
            }
            Ok(if tag == TAG_ARRAY {
                StackItem::Array(items)
            } else {
                StackItem::Struct(items)
            })
        }
        TAG_MAP => {
            let count = r.read_var_int().map_err(codec_err)? as usize;
            let mut entries = Vec::with_capacity(count.min(1024));
            for _ in 0..count {
                let key = read_item(r, depth + 1)?;
                let value = read_item(r, depth + 1)?;
                entries.push((key, value));
            }
            Ok(StackItem::Map(entries))
        }
        other => Err(InteropError::Codec(format!(
            "unknown item tag {other:#04x}"
        ))),
    }
}
