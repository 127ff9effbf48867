// Path: crates/host/src/interop/blockchain.rs
//! `Blockchain.*` and `Block.*` handlers: remote lookups and the block
//! object they hand to the script.

use std::rc::Rc;

use dryrun_types::error::InteropError;
use dryrun_types::{Hash160, Hash256};
use dryrun_vm::{InteropValue, StackItem, MAX_ARRAY_SIZE};

use crate::context::SyscallCtx;

/// A block or header operand is either a 32-byte hash or a small
/// integer index (at most 5 bytes on the stack); the index resolves to
/// a hash through the adapter first.
fn pop_block_hash(ctx: &mut SyscallCtx<'_, '_>) -> Result<Hash256, InteropError> {
    let item = ctx.pop()?;
    let bytes = item.to_bytes()?;
    if bytes.len() <= 5 {
        let index = item.to_int()?;
        if index < 0 || index > u32::MAX as i64 {
            return Err(InteropError::BadBlockIndex(index));
        }
        Ok(ctx.run.view.hash_by_height(index as u32)?)
    } else {
        Hash256::from_bytes(&bytes).map_err(|_| InteropError::BadParameterLength(bytes.len()))
    }
}

pub fn get_block(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let hash = pop_block_hash(ctx)?;
    let block = ctx.run.view.block_by_hash(&hash)?;
    ctx.push(InteropValue::Block(Rc::new(block)));
    Ok(())
}

pub fn get_header(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let hash = pop_block_hash(ctx)?;
    let header = ctx.run.view.header_by_hash(&hash)?;
    ctx.push(InteropValue::Header(Rc::new(header)));
    Ok(())
}

/// Pinned at startup; answered locally without a remote query.
pub fn get_height(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let height = ctx.run.height;
    ctx.push(height as i64);
    Ok(())
}

pub fn get_contract(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let bytes = ctx.pop_bytes()?;
    let hash =
        Hash160::from_bytes(&bytes).map_err(|_| InteropError::BadParameterLength(bytes.len()))?;
    let contract = ctx.run.view.contract_at(&hash, ctx.run.height)?;
    ctx.push(InteropValue::Contract(Rc::new(contract)));
    Ok(())
}

fn pop_tx_hash(ctx: &mut SyscallCtx<'_, '_>) -> Result<Hash256, InteropError> {
    let bytes = ctx.pop_bytes()?;
    Hash256::from_bytes(&bytes).map_err(|_| InteropError::BadParameterLength(bytes.len()))
}

pub fn get_transaction(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let hash = pop_tx_hash(ctx)?;
    let tx = ctx.run.view.transaction_by_hash(&hash)?;
    ctx.push(InteropValue::Transaction(Rc::new(tx)));
    Ok(())
}

/// The node's query surface carries no inclusion height for a
/// transaction; existence is verified remotely and the height reported
/// as zero, as the tool has always done.
pub fn get_transaction_height(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let hash = pop_tx_hash(ctx)?;
    ctx.run.view.transaction_by_hash(&hash)?;
    ctx.push(0i64);
    Ok(())
}

pub fn block_get_transaction(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let block = ctx.pop_block()?;
    let index = ctx.pop_int()?;
    let tx = usize::try_from(index)
        .ok()
        .and_then(|i| block.transactions.get(i))
        .ok_or(InteropError::IndexOutOfRange {
            index,
            len: block.transactions.len(),
        })?;
    ctx.push(InteropValue::Transaction(Rc::new(tx.clone())));
    Ok(())
}

pub fn block_get_transaction_count(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let block = ctx.pop_block()?;
    ctx.push(block.transactions.len() as i64);
    Ok(())
}

pub fn block_get_transactions(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let block = ctx.pop_block()?;
    if block.transactions.len() > MAX_ARRAY_SIZE {
        return Err(InteropError::TooManyItems(block.transactions.len()));
    }
    let items = block
        .transactions
        .iter()
        .map(|tx| StackItem::Interop(InteropValue::Transaction(Rc::new(tx.clone()))))
        .collect::<Vec<_>>();
    ctx.push(StackItem::Array(items));
    Ok(())
}
