// Path: crates/host/src/gas.rs
//! Gas price model.
//!
//! Prices come in two currencies: cheap operations are quoted in "price
//! units" scaled by [`PRICE_UNIT_RATIO`], expensive syscalls in whole
//! GAS. Both resolve to the same raw fixed-point representation with 8
//! decimals. The dynamic table keys on syscall ids rather than registry
//! entries, so legacy and long-retired namespace aliases still price
//! correctly even where dispatch would fault.

use dryrun_types::ContractProperties;
use dryrun_vm::{opcode, syscall_id, EvalStack, StackItem};

use crate::interop::InteropRegistry;

/// Raw fixed-point value of one price unit.
pub const PRICE_UNIT_RATIO: i64 = 100_000;

/// Raw fixed-point value of one GAS.
pub const GAS_PRECISION: i64 = 100_000_000;

// Dynamic-pricing ids, including the retired third-generation aliases.
// `dryrun_vm::interop_id` reproduces each of these from its name.
const NEO_ASSET_CREATE: u32 = 0x1fc6_c583; // Neo.Asset.Create
const ANT_ASSET_CREATE: u32 = 0x9902_5068; // AntShares.Asset.Create
const NEO_ASSET_RENEW: u32 = 0x7190_8478; // Neo.Asset.Renew
const ANT_ASSET_RENEW: u32 = 0xaf22_447b; // AntShares.Asset.Renew
const NEO_CONTRACT_CREATE: u32 = 0x6ea5_6cf6; // Neo.Contract.Create
const NEO_CONTRACT_MIGRATE: u32 = 0x9062_1b47; // Neo.Contract.Migrate
const ANT_CONTRACT_CREATE: u32 = 0x2a28_d29b; // AntShares.Contract.Create
const ANT_CONTRACT_MIGRATE: u32 = 0xa934_c8bb; // AntShares.Contract.Migrate
const SYSTEM_STORAGE_PUT: u32 = 0x8418_3fe6; // System.Storage.Put
const SYSTEM_STORAGE_PUT_EX: u32 = 0x3a9b_e173; // System.Storage.PutEx
const NEO_STORAGE_PUT: u32 = 0xf541_a152; // Neo.Storage.Put
const ANT_STORAGE_PUT: u32 = 0x5f30_0a9e; // AntShares.Storage.Put

fn units(n: i64) -> i64 {
    n * PRICE_UNIT_RATIO
}

fn gas(n: i64) -> i64 {
    n * GAS_PRECISION
}

/// Price of the opcode about to execute, in raw fixed-point gas.
/// `immediate` is the decoded operand (the syscall name for SYSCALL);
/// `stack` is the evaluation stack as it stands before the opcode runs.
pub fn opcode_price(
    op: u8,
    immediate: &[u8],
    stack: &EvalStack,
    registry: &InteropRegistry,
) -> i64 {
    if op <= opcode::NOP {
        return 0;
    }
    match op {
        opcode::APPCALL | opcode::TAILCALL => units(10),
        opcode::SYSCALL => syscall_price(syscall_id(immediate), stack, registry),
        opcode::SHA1 | opcode::SHA256 => units(10),
        opcode::HASH160 | opcode::HASH256 => units(20),
        opcode::CHECKSIG | opcode::VERIFY => units(100),
        opcode::CHECKMULTISIG => units(100 * multisig_key_count(stack)),
        _ => units(1),
    }
}

/// Key count for multisignature pricing: the length of a top-of-stack
/// array or struct, or the top integer. An empty stack or a count below
/// one prices as a single unit.
fn multisig_key_count(stack: &EvalStack) -> i64 {
    let n = match stack.peek(0) {
        Ok(StackItem::Array(items)) | Ok(StackItem::Struct(items)) => items.len() as i64,
        Ok(item) => item.to_int().unwrap_or(0),
        Err(_) => 0,
    };
    n.max(1)
}

fn syscall_price(id: u32, stack: &EvalStack, registry: &InteropRegistry) -> i64 {
    if let Some(entry) = registry.lookup(id) {
        if entry.price_units > 0 {
            return units(entry.price_units as i64);
        }
    }
    dynamic_price(id, stack)
}

fn dynamic_price(id: u32, stack: &EvalStack) -> i64 {
    match id {
        NEO_ASSET_CREATE | ANT_ASSET_CREATE => gas(5000),
        NEO_ASSET_RENEW | ANT_ASSET_RENEW => {
            let years = stack.peek(1).and_then(StackItem::to_int).unwrap_or(0);
            gas(years * 5000)
        }
        NEO_CONTRACT_CREATE | NEO_CONTRACT_MIGRATE | ANT_CONTRACT_CREATE
        | ANT_CONTRACT_MIGRATE => {
            let bits = stack.peek(3).and_then(StackItem::to_int).unwrap_or(0);
            deployment_price(ContractProperties::from_bits_truncate(bits as u8))
        }
        SYSTEM_STORAGE_PUT | SYSTEM_STORAGE_PUT_EX | NEO_STORAGE_PUT | ANT_STORAGE_PUT => {
            // 1 GAS per started KiB of key plus value.
            let key_len = operand_len(stack, 1);
            let value_len = operand_len(stack, 2);
            gas(((key_len + value_len).saturating_sub(1) / 1024 + 1) as i64)
        }
        _ => gas(1),
    }
}

fn operand_len(stack: &EvalStack, depth: usize) -> usize {
    stack
        .peek(depth)
        .and_then(StackItem::to_bytes)
        .map(|b| b.len())
        .unwrap_or(0)
}

/// Deployment fee from the declared property bits: 100 GAS base, 400
/// more with storage, 500 more with dynamic invoke.
fn deployment_price(properties: ContractProperties) -> i64 {
    let mut fee = 100;
    if properties.contains(ContractProperties::HAS_STORAGE) {
        fee += 400;
    }
    if properties.contains(ContractProperties::HAS_DYNAMIC_INVOKE) {
        fee += 500;
    }
    gas(fee)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dryrun_vm::interop_id;

    fn registry() -> InteropRegistry {
        InteropRegistry::new()
    }

    #[test]
    fn dynamic_ids_match_their_names() {
        assert_eq!(interop_id(b"Neo.Asset.Renew"), NEO_ASSET_RENEW);
        assert_eq!(interop_id(b"AntShares.Asset.Renew"), ANT_ASSET_RENEW);
        assert_eq!(interop_id(b"Neo.Contract.Create"), NEO_CONTRACT_CREATE);
        assert_eq!(interop_id(b"Neo.Contract.Migrate"), NEO_CONTRACT_MIGRATE);
        assert_eq!(interop_id(b"AntShares.Contract.Create"), ANT_CONTRACT_CREATE);
        assert_eq!(interop_id(b"AntShares.Contract.Migrate"), ANT_CONTRACT_MIGRATE);
        assert_eq!(interop_id(b"System.Storage.PutEx"), SYSTEM_STORAGE_PUT_EX);
        assert_eq!(interop_id(b"AntShares.Storage.Put"), ANT_STORAGE_PUT);
    }

    #[test]
    fn cheap_opcodes_are_free() {
        let stack = EvalStack::new();
        let reg = registry();
        assert_eq!(opcode_price(opcode::PUSH1, &[], &stack, &reg), 0);
        assert_eq!(opcode_price(opcode::NOP, &[], &stack, &reg), 0);
        assert_eq!(opcode_price(opcode::DUP, &[], &stack, &reg), units(1));
        assert_eq!(opcode_price(opcode::APPCALL, &[], &stack, &reg), units(10));
        assert_eq!(opcode_price(opcode::HASH256, &[], &stack, &reg), units(20));
    }

    #[test]
    fn multisig_prices_per_key() {
        let reg = registry();
        let mut stack = EvalStack::new();
        assert_eq!(
            opcode_price(opcode::CHECKMULTISIG, &[], &stack, &reg),
            units(1)
        );
        stack.push(StackItem::Array(vec![StackItem::Integer(0); 5]));
        assert_eq!(
            opcode_price(opcode::CHECKMULTISIG, &[], &stack, &reg),
            units(500)
        );
        let mut stack = EvalStack::new();
        stack.push(-3i64);
        assert_eq!(
            opcode_price(opcode::CHECKMULTISIG, &[], &stack, &reg),
            units(1)
        );
    }

    #[test]
    fn storage_put_prices_per_started_kib() {
        let reg = registry();
        let mut stack = EvalStack::new();
        // Pop order is context, key, value: value sits deepest.
        stack.push(vec![0u8; 2000]);
        stack.push(vec![0u8; 100]);
        stack.push(0i64); // stand-in for the context at the top
        assert_eq!(
            opcode_price(opcode::SYSCALL, b"System.Storage.Put", &stack, &reg),
            gas(3)
        );
        // Exactly 1024 bytes is still a single GAS.
        let mut stack = EvalStack::new();
        stack.push(vec![0u8; 1000]);
        stack.push(vec![0u8; 24]);
        stack.push(0i64);
        assert_eq!(
            opcode_price(opcode::SYSCALL, b"System.Storage.Put", &stack, &reg),
            gas(1)
        );
    }

    #[test]
    fn deployment_fee_follows_property_bits() {
        let reg = registry();
        let mut stack = EvalStack::new();
        stack.push(
            (ContractProperties::HAS_STORAGE | ContractProperties::HAS_DYNAMIC_INVOKE).bits()
                as i64,
        );
        stack.push(0i64);
        stack.push(0i64);
        stack.push(0i64);
        assert_eq!(
            opcode_price(opcode::SYSCALL, b"Neo.Contract.Create", &stack, &reg),
            gas(1000)
        );
    }

    #[test]
    fn asset_renew_scales_with_years() {
        let reg = registry();
        let mut stack = EvalStack::new();
        stack.push(2i64); // years at depth 1
        stack.push(0i64);
        assert_eq!(
            opcode_price(opcode::SYSCALL, b"Neo.Asset.Renew", &stack, &reg),
            gas(10_000)
        );
    }

    #[test]
    fn registered_syscalls_use_their_unit_price() {
        let reg = registry();
        let stack = EvalStack::new();
        assert_eq!(
            opcode_price(opcode::SYSCALL, b"System.Runtime.CheckWitness", &stack, &reg),
            units(200)
        );
        assert_eq!(
            opcode_price(opcode::SYSCALL, b"System.Blockchain.GetBlock", &stack, &reg),
            units(200)
        );
        // Unknown names fall back to the 1 GAS default.
        assert_eq!(
            opcode_price(opcode::SYSCALL, b"No.Such.Syscall", &stack, &reg),
            gas(1)
        );
    }
}
