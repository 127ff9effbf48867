// Path: crates/host/src/interop/runtime.rs
//! `Runtime.*` handlers.

use log::info;

use dryrun_types::error::InteropError;
use dryrun_vm::codec;

use crate::context::SyscallCtx;

/// Application trigger byte: scripts run here as if invoked by a
/// transaction, never for verification.
const TRIGGER_APPLICATION: i64 = 0x10;

pub fn check_witness(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let param = ctx.pop_bytes()?;
    let authorized = ctx.run.witnesses.check(&param)?;
    ctx.push(authorized);
    Ok(())
}

pub fn serialize(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let item = ctx.pop()?;
    let bytes = codec::serialize(&item)?;
    ctx.push(bytes);
    Ok(())
}

pub fn deserialize(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let bytes = ctx.pop_bytes()?;
    let item = codec::deserialize(&bytes)?;
    ctx.push(item);
    Ok(())
}

/// Timestamp of the block at the pinned height.
pub fn get_time(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let header = ctx.run.view.header_by_height(ctx.run.height)?;
    ctx.push(header.timestamp as i64);
    Ok(())
}

pub fn get_trigger(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    ctx.push(TRIGGER_APPLICATION);
    Ok(())
}

/// Log and notify have no chain to deliver to; the payload goes to the
/// process log and is otherwise discarded.
pub fn log_message(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let message = ctx.pop_bytes()?;
    info!("[LOG] {}", String::from_utf8_lossy(&message));
    Ok(())
}

pub fn notify(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let item = ctx.pop()?;
    info!("[NOTIFY] {}", item.type_name());
    Ok(())
}

pub fn platform(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    ctx.push(b"NEO".to_vec());
    Ok(())
}
