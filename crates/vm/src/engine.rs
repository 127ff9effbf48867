// Path: crates/vm/src/engine.rs
//! Reference interpreter and the host callback boundary.
//!
//! The interpreter executes the push, flow, stack-shuffle, call and
//! syscall opcodes — the subset an invocation script needs to exercise
//! the host environment. Every other opcode faults. Faults end the run
//! with a FAULT state and the gas consumed so far; they never propagate
//! out as panics.

use log::debug;

use dryrun_types::error::{InteropError, VmError};
use dryrun_types::{hash160, Hash160};

use crate::item::{EvalStack, StackItem};
use crate::{interop_id, opcode};

/// Cap on arrays built by syscall handlers.
pub const MAX_ARRAY_SIZE: usize = 1024;

/// Cap on the invocation stack depth.
const MAX_INVOCATION_DEPTH: usize = 1024;

/// The three callback contracts the host environment supplies to the
/// engine. No call ever returns control to the engine without an answer;
/// all of them are synchronous.
pub trait HostInterface {
    /// Contract-code lookup: script bytes plus the has-dynamic-invoke
    /// property bit for the given script hash.
    fn contract_code(&mut self, hash: &Hash160) -> Result<(Vec<u8>, bool), VmError>;

    /// Gas price of one opcode about to execute, in raw fixed-point gas.
    fn price(&mut self, op: u8, immediate: &[u8], stack: &EvalStack) -> i64;

    /// Dispatch one syscall against the evaluation stack.
    fn syscall(
        &mut self,
        id: u32,
        stack: &mut EvalStack,
        frames: &CallStack,
    ) -> Result<(), VmError>;
}

/// Read-only view of the invocation stack offered to syscall handlers.
/// Index 0 of `at` is the currently executing script, 1 its caller.
pub struct CallStack {
    hashes: Vec<Hash160>,
}

impl CallStack {
    pub fn depth(&self) -> usize {
        self.hashes.len()
    }

    pub fn at(&self, depth_from_top: usize) -> Option<Hash160> {
        let len = self.hashes.len();
        if depth_from_top >= len {
            return None;
        }
        Some(self.hashes[len - 1 - depth_from_top])
    }

    pub fn executing(&self) -> Option<Hash160> {
        self.at(0)
    }

    pub fn calling(&self) -> Option<Hash160> {
        self.at(1)
    }

    pub fn entry(&self) -> Option<Hash160> {
        self.hashes.first().copied()
    }

    /// Test helper for exercising handlers without a running engine.
    pub fn from_hashes(hashes: Vec<Hash160>) -> Self {
        Self { hashes }
    }
}

/// Final state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmState {
    Halt,
    Fault,
}

impl VmState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Halt => "HALT",
            Self::Fault => "FAULT",
        }
    }
}

/// Outcome of a run: final state, gas consumed (raw fixed-point), the
/// remaining evaluation stack top-first, and the fault cause if any.
#[derive(Debug)]
pub struct ExecutionResult {
    pub state: VmState,
    pub gas_consumed: i64,
    pub stack: Vec<StackItem>,
    pub fault: Option<VmError>,
}

struct Frame {
    script: Vec<u8>,
    ip: usize,
    hash: Hash160,
}

pub struct Engine<'h, H: HostInterface> {
    host: &'h mut H,
    stack: EvalStack,
    frames: Vec<Frame>,
    gas_limit: i64,
    gas_consumed: i64,
}

impl<'h, H: HostInterface> Engine<'h, H> {
    pub fn new(host: &'h mut H, gas_limit: i64) -> Self {
        Self {
            host,
            stack: EvalStack::new(),
            frames: Vec::new(),
            gas_limit,
            gas_consumed: 0,
        }
    }

    /// Loads the entry script. Its hash becomes the entry script hash
    /// visible to the execution-context syscalls.
    pub fn load_script(&mut self, script: Vec<u8>) {
        let hash = hash160(&script);
        self.frames.push(Frame {
            script,
            ip: 0,
            hash,
        });
    }

    pub fn run(mut self) -> ExecutionResult {
        loop {
            if self.frames.is_empty() {
                return ExecutionResult {
                    state: VmState::Halt,
                    gas_consumed: self.gas_consumed,
                    stack: self.stack.into_items(),
                    fault: None,
                };
            }
            if let Err(fault) = self.step() {
                debug!("script fault: {fault}");
                return ExecutionResult {
                    state: VmState::Fault,
                    gas_consumed: self.gas_consumed,
                    stack: self.stack.into_items(),
                    fault: Some(fault),
                };
            }
        }
    }

    fn call_stack(&self) -> CallStack {
        CallStack {
            hashes: self.frames.iter().map(|f| f.hash).collect(),
        }
    }

    fn step(&mut self) -> Result<(), VmError> {
        // Reaching the end of a script behaves like RET.
        let (op, immediate) = {
            let frame = match self.frames.last_mut() {
                Some(f) => f,
                None => return Ok(()),
            };
            if frame.ip >= frame.script.len() {
                self.frames.pop();
                return Ok(());
            }
            let op = frame.script[frame.ip];
            frame.ip += 1;
            let immediate = read_immediate(op, &frame.script, &mut frame.ip)?;
            (op, immediate)
        };

        self.charge(op, &immediate)?;

        match op {
            opcode::PUSH0 => self.stack.push(Vec::new()),
            0x01..=opcode::PUSHBYTES75 | opcode::PUSHDATA1..=opcode::PUSHDATA4 => {
                self.stack.push(immediate)
            }
            opcode::PUSHM1 => self.stack.push(-1i64),
            opcode::PUSH1..=opcode::PUSH16 => {
                self.stack.push((op - opcode::PUSH1 + 1) as i64)
            }
            opcode::NOP => {}
            opcode::RET => {
                self.frames.pop();
            }
            opcode::DROP => {
                self.stack.pop().map_err(|_| VmError::StackUnderflow)?;
            }
            opcode::DUP => {
                let top = self
                    .stack
                    .peek(0)
                    .map_err(|_| VmError::StackUnderflow)?
                    .clone();
                self.stack.push(top);
            }
            opcode::SWAP => self.stack.swap_top().map_err(|_| VmError::StackUnderflow)?,
            opcode::SYSCALL => {
                let id = syscall_id(&immediate);
                let frames = self.call_stack();
                self.host.syscall(id, &mut self.stack, &frames)?;
            }
            opcode::APPCALL | opcode::TAILCALL => self.app_call(op, &immediate)?,
            other => return Err(VmError::UnsupportedOpcode(other)),
        }
        Ok(())
    }

    fn charge(&mut self, op: u8, immediate: &[u8]) -> Result<(), VmError> {
        let price = self.host.price(op, immediate, &self.stack);
        self.gas_consumed = self.gas_consumed.saturating_add(price);
        if self.gas_consumed > self.gas_limit {
            return Err(VmError::OutOfGas);
        }
        Ok(())
    }

    fn app_call(&mut self, op: u8, immediate: &[u8]) -> Result<(), VmError> {
        let hash = if immediate.iter().all(|b| *b == 0) {
            // Dynamic invoke: the target hash comes off the stack.
            let raw = self
                .stack
                .pop()
                .map_err(|_| VmError::StackUnderflow)?
                .to_bytes()
                .map_err(VmError::Syscall)?;
            Hash160::from_bytes(&raw)
                .map_err(|_| VmError::Syscall(InteropError::BadParameterLength(raw.len())))?
        } else {
            Hash160::from_bytes(immediate)
                .map_err(|e| VmError::BadScript(e.to_string()))?
        };

        let (script, _dynamic) = self.host.contract_code(&hash)?;
        if op == opcode::TAILCALL {
            self.frames.pop();
        }
        if self.frames.len() >= MAX_INVOCATION_DEPTH {
            return Err(VmError::CallDepthExceeded);
        }
        let frame_hash = hash160(&script);
        self.frames.push(Frame {
            script,
            ip: 0,
            hash: frame_hash,
        });
        Ok(())
    }
}

/// Decodes the immediate operand of `op`, advancing `ip` past it.
fn read_immediate(op: u8, script: &[u8], ip: &mut usize) -> Result<Vec<u8>, VmError> {
    let take = |ip: &mut usize, n: usize| -> Result<Vec<u8>, VmError> {
        let end = ip
            .checked_add(n)
            .filter(|e| *e <= script.len())
            .ok_or_else(|| VmError::BadScript("truncated immediate".into()))?;
        let out = script[*ip..end].to_vec();
        *ip = end;
        Ok(out)
    };
    match op {
        n @ 0x01..=opcode::PUSHBYTES75 => take(ip, n as usize),
        opcode::PUSHDATA1 | opcode::SYSCALL => {
            let len = take(ip, 1)?[0] as usize;
            take(ip, len)
        }
        opcode::PUSHDATA2 => {
            let raw = take(ip, 2)?;
            take(ip, u16::from_le_bytes([raw[0], raw[1]]) as usize)
        }
        opcode::PUSHDATA4 => {
            let raw = take(ip, 4)?;
            take(ip, u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize)
        }
        opcode::APPCALL | opcode::TAILCALL => take(ip, 20),
        _ => Ok(Vec::new()),
    }
}

/// A four-byte syscall operand is a raw little-endian identifier; any
/// other length is a name to hash. Both forms appear in deployed scripts.
pub fn syscall_id(operand: &[u8]) -> u32 {
    if operand.len() == 4 {
        u32::from_le_bytes([operand[0], operand[1], operand[2], operand[3]])
    } else {
        interop_id(operand)
    }
}
