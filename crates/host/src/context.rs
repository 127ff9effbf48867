// Path: crates/host/src/context.rs
//! Run-scoped state and the view of it a syscall handler receives.

use std::cell::RefCell;
use std::rc::Rc;

use dryrun_chain::ChainView;
use dryrun_types::error::InteropError;
use dryrun_types::{Block, Contract, Header, StorageContext, Transaction};
use dryrun_types::{TxAttribute, TxInput, TxOutput, TxWitness};
use dryrun_vm::{CallStack, Enumerator, EvalStack, InteropValue, KeyedIterator, StackItem};

use crate::storage::{db_key, StorageOverlay};
use crate::witness::WitnessSet;

/// Everything one script run owns: the chain view, the height it was
/// pinned to at startup, the local write overlay, and the witness set.
pub struct RunContext<'v> {
    pub view: &'v dyn ChainView,
    pub overlay: StorageOverlay,
    pub witnesses: WitnessSet,
    pub height: u32,
}

impl<'v> RunContext<'v> {
    pub fn new(view: &'v dyn ChainView, witnesses: WitnessSet, height: u32) -> Self {
        Self {
            view,
            overlay: StorageOverlay::new(),
            witnesses,
            height,
        }
    }

    /// Overlay-first storage read. A miss goes to the adapter at the
    /// pinned height and is NOT cached: only writes live in the overlay,
    /// so repeated remote reads stay visible in the request log.
    pub fn storage_value(
        &self,
        ctx: &StorageContext,
        key: &[u8],
    ) -> Result<Vec<u8>, InteropError> {
        if let Some(hit) = self.overlay.cached(&ctx.script_hash, key) {
            return Ok(hit.to_vec());
        }
        let value = self
            .view
            .storage_at(&db_key(&ctx.script_hash, key), self.height)?;
        Ok(value)
    }
}

/// Handler-side view of one syscall: the evaluation stack, the
/// invocation stack, and the run state.
pub struct SyscallCtx<'a, 'v> {
    pub stack: &'a mut EvalStack,
    pub frames: &'a CallStack,
    pub run: &'a mut RunContext<'v>,
}

impl SyscallCtx<'_, '_> {
    pub fn pop(&mut self) -> Result<StackItem, InteropError> {
        self.stack.pop()
    }

    pub fn pop_bytes(&mut self) -> Result<Vec<u8>, InteropError> {
        self.stack.pop()?.to_bytes()
    }

    pub fn pop_int(&mut self) -> Result<i64, InteropError> {
        self.stack.pop()?.to_int()
    }

    pub fn push(&mut self, item: impl Into<StackItem>) {
        self.stack.push(item);
    }

    pub fn pop_block(&mut self) -> Result<Rc<Block>, InteropError> {
        match self.stack.pop()? {
            StackItem::Interop(InteropValue::Block(b)) => Ok(b),
            _ => Err(InteropError::WrongInteropType { expected: "Block" }),
        }
    }

    /// A header operand accepts either a header or a full block (the
    /// block stands in for its own header).
    pub fn pop_header(&mut self) -> Result<Header, InteropError> {
        match self.stack.pop()? {
            StackItem::Interop(InteropValue::Header(h)) => Ok((*h).clone()),
            StackItem::Interop(InteropValue::Block(b)) => Ok(b.header.clone()),
            _ => Err(InteropError::WrongInteropType { expected: "Header" }),
        }
    }

    pub fn pop_transaction(&mut self) -> Result<Rc<Transaction>, InteropError> {
        match self.stack.pop()? {
            StackItem::Interop(InteropValue::Transaction(tx)) => Ok(tx),
            _ => Err(InteropError::WrongInteropType {
                expected: "Transaction",
            }),
        }
    }

    pub fn pop_contract(&mut self) -> Result<Rc<Contract>, InteropError> {
        match self.stack.pop()? {
            StackItem::Interop(InteropValue::Contract(c)) => Ok(c),
            _ => Err(InteropError::WrongInteropType {
                expected: "Contract",
            }),
        }
    }

    pub fn pop_attribute(&mut self) -> Result<Rc<TxAttribute>, InteropError> {
        match self.stack.pop()? {
            StackItem::Interop(InteropValue::Attribute(a)) => Ok(a),
            _ => Err(InteropError::WrongInteropType {
                expected: "Attribute",
            }),
        }
    }

    pub fn pop_input(&mut self) -> Result<Rc<TxInput>, InteropError> {
        match self.stack.pop()? {
            StackItem::Interop(InteropValue::Input(i)) => Ok(i),
            _ => Err(InteropError::WrongInteropType { expected: "Input" }),
        }
    }

    pub fn pop_output(&mut self) -> Result<Rc<TxOutput>, InteropError> {
        match self.stack.pop()? {
            StackItem::Interop(InteropValue::Output(o)) => Ok(o),
            _ => Err(InteropError::WrongInteropType { expected: "Output" }),
        }
    }

    pub fn pop_witness(&mut self) -> Result<Rc<TxWitness>, InteropError> {
        match self.stack.pop()? {
            StackItem::Interop(InteropValue::Witness(w)) => Ok(w),
            _ => Err(InteropError::WrongInteropType { expected: "Witness" }),
        }
    }

    pub fn pop_storage_context(&mut self) -> Result<StorageContext, InteropError> {
        match self.stack.pop()? {
            StackItem::Interop(InteropValue::StorageContext(c)) => Ok(c),
            _ => Err(InteropError::WrongInteropType {
                expected: "StorageContext",
            }),
        }
    }

    pub fn pop_iterator(&mut self) -> Result<Rc<RefCell<KeyedIterator>>, InteropError> {
        match self.stack.pop()? {
            StackItem::Interop(InteropValue::Iterator(it)) => Ok(it),
            _ => Err(InteropError::WrongInteropType {
                expected: "Iterator",
            }),
        }
    }

    /// Enumerator operands also accept an iterator handle, which behaves
    /// as the enumerator over its values.
    pub fn pop_enumerator(&mut self) -> Result<EnumeratorHandle, InteropError> {
        match self.stack.pop()? {
            StackItem::Interop(InteropValue::Enumerator(e)) => Ok(EnumeratorHandle::Plain(e)),
            StackItem::Interop(InteropValue::Iterator(it)) => Ok(EnumeratorHandle::Keyed(it)),
            _ => Err(InteropError::WrongInteropType {
                expected: "Enumerator",
            }),
        }
    }
}

/// Either kind of cursor handle, viewed as an enumerator.
pub enum EnumeratorHandle {
    Plain(Rc<RefCell<Enumerator>>),
    Keyed(Rc<RefCell<KeyedIterator>>),
}

impl EnumeratorHandle {
    pub fn next(&self) -> bool {
        match self {
            Self::Plain(e) => e.borrow_mut().next(),
            Self::Keyed(it) => it.borrow_mut().next(),
        }
    }

    pub fn value(&self) -> Result<StackItem, InteropError> {
        match self {
            Self::Plain(e) => e.borrow().value(),
            Self::Keyed(it) => it.borrow().value(),
        }
    }

    /// Remaining elements as a plain enumerator, for concatenation.
    pub fn remaining(&self) -> Enumerator {
        match self {
            Self::Plain(e) => e.borrow().concat(&Enumerator::new(Vec::new())),
            Self::Keyed(it) => it.borrow().values_enumerator(),
        }
    }
}
