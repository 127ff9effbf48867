// Path: crates/host/src/interop/engine.rs
//! `ExecutionEngine.*` handlers: script-hash introspection over the
//! invocation stack.

use dryrun_types::error::InteropError;

use crate::context::SyscallCtx;

fn push_frame_hash(ctx: &mut SyscallCtx<'_, '_>, depth: usize) -> Result<(), InteropError> {
    let hash = ctx
        .frames
        .at(depth)
        .ok_or(InteropError::IndexOutOfRange {
            index: depth as i64,
            len: ctx.frames.depth(),
        })?;
    ctx.push(hash.as_bytes().to_vec());
    Ok(())
}

pub fn get_executing_script_hash(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    push_frame_hash(ctx, 0)
}

pub fn get_calling_script_hash(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    push_frame_hash(ctx, 1)
}

pub fn get_entry_script_hash(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let depth = ctx.frames.depth();
    push_frame_hash(ctx, depth.saturating_sub(1))
}
