// Path: crates/host/src/interop/collections.rs
//! `Enumerator.*` and `Iterator.*` handlers.
//!
//! Handles are shared cursors: duplicating one on the stack and
//! advancing it through either copy advances both. Enumerator
//! operations also accept iterator handles, which enumerate values.

use std::cell::RefCell;
use std::rc::Rc;

use dryrun_types::error::InteropError;
use dryrun_vm::{Enumerator, InteropValue, KeyedIterator, StackItem};

use crate::context::SyscallCtx;

pub fn enumerator_create(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    match ctx.pop()? {
        StackItem::Array(items) | StackItem::Struct(items) => {
            let e = Enumerator::new(items);
            ctx.push(InteropValue::Enumerator(Rc::new(RefCell::new(e))));
            Ok(())
        }
        _ => Err(InteropError::WrongInteropType { expected: "Array" }),
    }
}

pub fn enumerator_next(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let handle = ctx.pop_enumerator()?;
    let advanced = handle.next();
    ctx.push(advanced);
    Ok(())
}

pub fn enumerator_value(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let handle = ctx.pop_enumerator()?;
    let value = handle.value()?;
    ctx.push(value);
    Ok(())
}

pub fn enumerator_concat(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let first = ctx.pop_enumerator()?;
    let second = ctx.pop_enumerator()?;
    let combined = first.remaining().concat(&second.remaining());
    ctx.push(InteropValue::Enumerator(Rc::new(RefCell::new(combined))));
    Ok(())
}

pub fn iterator_create(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let it = match ctx.pop()? {
        StackItem::Array(items) | StackItem::Struct(items) => KeyedIterator::from_array(items),
        StackItem::Map(entries) => KeyedIterator::from_map(entries),
        _ => {
            return Err(InteropError::WrongInteropType {
                expected: "Array or Map",
            })
        }
    };
    ctx.push(InteropValue::Iterator(Rc::new(RefCell::new(it))));
    Ok(())
}

pub fn iterator_key(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let it = ctx.pop_iterator()?;
    let key = it.borrow().key()?;
    ctx.push(key);
    Ok(())
}

pub fn iterator_keys(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let it = ctx.pop_iterator()?;
    let keys = it.borrow().keys_enumerator();
    ctx.push(InteropValue::Enumerator(Rc::new(RefCell::new(keys))));
    Ok(())
}

pub fn iterator_values(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let it = ctx.pop_iterator()?;
    let values = it.borrow().values_enumerator();
    ctx.push(InteropValue::Enumerator(Rc::new(RefCell::new(values))));
    Ok(())
}

pub fn iterator_concat(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let first = ctx.pop_iterator()?;
    let second = ctx.pop_iterator()?;
    let combined = {
        let a = first.borrow();
        let b = second.borrow();
        a.concat(&b)
    };
    ctx.push(InteropValue::Iterator(Rc::new(RefCell::new(combined))));
    Ok(())
}
