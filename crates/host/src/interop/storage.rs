// Path: crates/host/src/interop/storage.rs
//! `Storage.*` and `StorageContext.*` handlers.
//!
//! Contexts are minted from the executing script hash, so a script can
//! only ever obtain a capability over its own key space (or a contract
//! record it fetched, via `Contract.GetStorageContext`).

use dryrun_types::error::InteropError;
use dryrun_types::StorageContext;
use dryrun_vm::InteropValue;

use crate::context::SyscallCtx;

fn executing_context(ctx: &SyscallCtx<'_, '_>) -> Result<StorageContext, InteropError> {
    let hash = ctx
        .frames
        .executing()
        .ok_or(InteropError::WrongInteropType {
            expected: "executing context",
        })?;
    Ok(StorageContext::new(hash))
}

pub fn get_context(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let sc = executing_context(ctx)?;
    ctx.push(InteropValue::StorageContext(sc));
    Ok(())
}

pub fn get_read_only_context(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let sc = executing_context(ctx)?.as_read_only();
    ctx.push(InteropValue::StorageContext(sc));
    Ok(())
}

pub fn get(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let sc = ctx.pop_storage_context()?;
    let key = ctx.pop_bytes()?;
    let value = ctx.run.storage_value(&sc, &key)?;
    ctx.push(value);
    Ok(())
}

pub fn put(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let sc = ctx.pop_storage_context()?;
    let key = ctx.pop_bytes()?;
    let value = ctx.pop_bytes()?;
    ctx.run.overlay.put(&sc, key, value)
}

/// Put with a trailing flags operand. The chain's flag semantics concern
/// persisted state the overlay never writes back, so the flags are
/// popped and discarded after the write.
pub fn put_ex(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let sc = ctx.pop_storage_context()?;
    let key = ctx.pop_bytes()?;
    let value = ctx.pop_bytes()?;
    ctx.run.overlay.put(&sc, key, value)?;
    ctx.pop_int()?;
    Ok(())
}

pub fn delete(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let sc = ctx.pop_storage_context()?;
    let key = ctx.pop_bytes()?;
    ctx.run.overlay.delete(&sc, key)
}

pub fn as_read_only(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let sc = ctx.pop_storage_context()?;
    ctx.push(InteropValue::StorageContext(sc.as_read_only()));
    Ok(())
}
