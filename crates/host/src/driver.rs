// Path: crates/host/src/driver.rs
//! Execution driver: pins a height, wires the host hooks into the
//! engine, and renders the result document.

use log::{debug, info};
use serde::Serialize;

use dryrun_chain::ChainView;
use dryrun_types::error::{ChainError, ErrorCode, VmError};
use dryrun_vm::{CallStack, Engine, EvalStack, ExecutionResult, HostInterface, StackItem};

use crate::context::{RunContext, SyscallCtx};
use crate::gas;
use crate::interop::InteropRegistry;
use crate::witness::WitnessSet;

/// One pinned chain snapshot to run scripts against.
///
/// Pinning happens once at construction; a failure here is fatal to the
/// caller (there is no height to execute against), unlike adapter
/// failures during a run, which merely fault the script.
pub struct Runner<'v> {
    view: &'v dyn ChainView,
    witnesses: WitnessSet,
    registry: InteropRegistry,
    height: u32,
}

impl<'v> Runner<'v> {
    pub fn pin(view: &'v dyn ChainView, witnesses: WitnessSet) -> Result<Self, ChainError> {
        let count = view.block_count()?;
        let height = count.saturating_sub(1) as u32;
        info!("pinned execution height {height} ({count} blocks)");
        Ok(Self {
            view,
            witnesses,
            registry: InteropRegistry::new(),
            height,
        })
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Executes one script within the given gas budget and renders the
    /// result. Never fails: every script-level problem is a FAULT state
    /// inside the report.
    pub fn run(&self, script: &[u8], gas_limit: i64) -> RunReport {
        let mut run = RunContext::new(self.view, self.witnesses.clone(), self.height);
        let mut hooks = HostHooks {
            registry: &self.registry,
            run: &mut run,
        };
        let mut engine = Engine::new(&mut hooks, gas_limit);
        engine.load_script(script.to_vec());
        let result = engine.run();
        RunReport::render(script, result)
    }
}

/// The three engine callbacks, backed by the registry and run state.
struct HostHooks<'a, 'v> {
    registry: &'a InteropRegistry,
    run: &'a mut RunContext<'v>,
}

impl HostInterface for HostHooks<'_, '_> {
    fn contract_code(
        &mut self,
        hash: &dryrun_types::Hash160,
    ) -> Result<(Vec<u8>, bool), VmError> {
        let contract = self
            .run
            .view
            .contract_at(hash, self.run.height)
            .map_err(|e| VmError::ContractLookup(e.to_string()))?;
        debug!("[CONTRACT] {hash}");
        let dynamic = contract.has_dynamic_invoke();
        Ok((contract.script, dynamic))
    }

    fn price(&mut self, op: u8, immediate: &[u8], stack: &EvalStack) -> i64 {
        gas::opcode_price(op, immediate, stack, self.registry)
    }

    fn syscall(
        &mut self,
        id: u32,
        stack: &mut EvalStack,
        frames: &CallStack,
    ) -> Result<(), VmError> {
        let entry = self.registry.lookup(id).ok_or(VmError::UnknownSyscall(id))?;
        info!("[SYSCALL] {}", entry.name);
        let mut ctx = SyscallCtx {
            stack,
            frames,
            run: &mut *self.run,
        };
        (entry.handler)(&mut ctx).map_err(VmError::from)
    }
}

/// The JSON result document printed for one run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub script: String,
    pub state: String,
    pub gas_consumed: String,
    pub stack: Vec<StackParam>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<String>,
}

/// `{"type": ..., "value": ...}` rendering of one final stack item.
#[derive(Debug, Serialize)]
pub struct StackParam {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub value: serde_json::Value,
}

impl RunReport {
    fn render(script: &[u8], result: ExecutionResult) -> Self {
        Self {
            script: hex::encode(script),
            state: result.state.as_str().to_string(),
            gas_consumed: format_fixed8(result.gas_consumed),
            stack: result.stack.iter().map(StackParam::render).collect(),
            fault: result.fault.map(|e| e.code().to_string()),
        }
    }
}

impl StackParam {
    fn render(item: &StackItem) -> Self {
        let value = match item {
            StackItem::ByteArray(b) => serde_json::Value::String(hex::encode(b)),
            StackItem::Integer(n) => serde_json::Value::String(n.to_string()),
            StackItem::Bool(b) => serde_json::Value::Bool(*b),
            StackItem::Array(items) | StackItem::Struct(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(|inner| {
                        let rendered = Self::render(inner);
                        serde_json::json!({ "type": rendered.kind, "value": rendered.value })
                    })
                    .collect(),
            ),
            StackItem::Map(entries) => serde_json::Value::Array(
                entries
                    .iter()
                    .map(|(k, v)| {
                        let key = Self::render(k);
                        let value = Self::render(v);
                        serde_json::json!({
                            "key": { "type": key.kind, "value": key.value },
                            "value": { "type": value.kind, "value": value.value },
                        })
                    })
                    .collect(),
            ),
            StackItem::Interop(v) => serde_json::Value::String(v.type_name().to_string()),
        };
        Self {
            kind: item.type_name(),
            value,
        }
    }
}

/// Fixed-point with 8 decimals, rendered as a decimal string.
fn format_fixed8(raw: i64) -> String {
    format!("{}.{:08}", raw / 100_000_000, (raw % 100_000_000).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed8_rendering() {
        assert_eq!(format_fixed8(0), "0.00000000");
        assert_eq!(format_fixed8(100_000), "0.00100000");
        assert_eq!(format_fixed8(300_000_000), "3.00000000");
        assert_eq!(format_fixed8(50_000_000_001), "500.00000001");
    }

    #[test]
    fn stack_param_renders_nested_items() {
        let item = StackItem::Array(vec![
            StackItem::ByteArray(vec![0xde, 0xad]),
            StackItem::Integer(-7),
            StackItem::Bool(true),
        ]);
        let param = StackParam::render(&item);
        assert_eq!(param.kind, "Array");
        let rendered = serde_json::to_value(&param).unwrap();
        assert_eq!(rendered["value"][0]["value"], "dead");
        assert_eq!(rendered["value"][1]["value"], "-7");
        assert_eq!(rendered["value"][2]["value"], true);
    }
}
