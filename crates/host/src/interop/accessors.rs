// Path: crates/host/src/interop/accessors.rs
//! Field accessors over chain objects held as interop items.

use std::rc::Rc;

use dryrun_types::error::InteropError;
use dryrun_types::{Hash160, StorageContext, TxPayload};
use dryrun_vm::{opcode, InteropValue, StackItem, MAX_ARRAY_SIZE};

use crate::context::SyscallCtx;

// Header accessors. Each accepts a block in place of its header.

pub fn header_get_hash(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let header = ctx.pop_header()?;
    ctx.push(header.hash().as_bytes().to_vec());
    Ok(())
}

pub fn header_get_version(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let header = ctx.pop_header()?;
    ctx.push(header.version as i64);
    Ok(())
}

pub fn header_get_prev_hash(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let header = ctx.pop_header()?;
    ctx.push(header.prev_hash.as_bytes().to_vec());
    Ok(())
}

pub fn header_get_merkle_root(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let header = ctx.pop_header()?;
    ctx.push(header.merkle_root.as_bytes().to_vec());
    Ok(())
}

pub fn header_get_index(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let header = ctx.pop_header()?;
    ctx.push(header.index as i64);
    Ok(())
}

pub fn header_get_timestamp(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let header = ctx.pop_header()?;
    ctx.push(header.timestamp as i64);
    Ok(())
}

pub fn header_get_consensus_data(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let header = ctx.pop_header()?;
    ctx.push(header.consensus_data as i64);
    Ok(())
}

pub fn header_get_next_consensus(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let header = ctx.pop_header()?;
    ctx.push(header.next_consensus.as_bytes().to_vec());
    Ok(())
}

// Transaction accessors.

pub fn tx_get_hash(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let tx = ctx.pop_transaction()?;
    ctx.push(tx.hash().as_bytes().to_vec());
    Ok(())
}

pub fn tx_get_type(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let tx = ctx.pop_transaction()?;
    ctx.push(tx.kind.byte() as i64);
    Ok(())
}

fn push_list<T>(
    ctx: &mut SyscallCtx<'_, '_>,
    items: &[T],
    wrap: fn(Rc<T>) -> InteropValue,
) -> Result<(), InteropError>
where
    T: Clone,
{
    if items.len() > MAX_ARRAY_SIZE {
        return Err(InteropError::TooManyItems(items.len()));
    }
    let wrapped = items
        .iter()
        .map(|item| StackItem::Interop(wrap(Rc::new(item.clone()))))
        .collect::<Vec<_>>();
    ctx.push(StackItem::Array(wrapped));
    Ok(())
}

pub fn tx_get_attributes(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let tx = ctx.pop_transaction()?;
    push_list(ctx, &tx.attributes, InteropValue::Attribute)
}

pub fn tx_get_inputs(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let tx = ctx.pop_transaction()?;
    push_list(ctx, &tx.inputs, InteropValue::Input)
}

pub fn tx_get_outputs(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let tx = ctx.pop_transaction()?;
    push_list(ctx, &tx.outputs, InteropValue::Output)
}

pub fn tx_get_witnesses(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let tx = ctx.pop_transaction()?;
    push_list(ctx, &tx.witnesses, InteropValue::Witness)
}

pub fn invocation_tx_get_script(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let tx = ctx.pop_transaction()?;
    match &tx.payload {
        TxPayload::Invocation { script, .. } => {
            ctx.push(script.clone());
            Ok(())
        }
        _ => Err(InteropError::WrongInteropType {
            expected: "InvocationTransaction",
        }),
    }
}

// Attribute, input, output, witness accessors.

pub fn attribute_get_usage(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let attr = ctx.pop_attribute()?;
    ctx.push(attr.usage as i64);
    Ok(())
}

pub fn attribute_get_data(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let attr = ctx.pop_attribute()?;
    ctx.push(attr.data.clone());
    Ok(())
}

pub fn input_get_hash(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let input = ctx.pop_input()?;
    ctx.push(input.prev_hash.as_bytes().to_vec());
    Ok(())
}

pub fn input_get_index(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let input = ctx.pop_input()?;
    ctx.push(input.prev_index as i64);
    Ok(())
}

pub fn output_get_asset_id(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let output = ctx.pop_output()?;
    ctx.push(output.asset_id.as_bytes().to_vec());
    Ok(())
}

pub fn output_get_value(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let output = ctx.pop_output()?;
    let value = output.value;
    ctx.push(value);
    Ok(())
}

pub fn output_get_script_hash(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let output = ctx.pop_output()?;
    ctx.push(output.script_hash.as_bytes().to_vec());
    Ok(())
}

pub fn witness_get_verification_script(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let witness = ctx.pop_witness()?;
    ctx.push(witness.verification.clone());
    Ok(())
}

// Contract accessors.

pub fn contract_get_script(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let contract = ctx.pop_contract()?;
    ctx.push(contract.script.clone());
    Ok(())
}

pub fn contract_is_payable(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let contract = ctx.pop_contract()?;
    ctx.push(contract.is_payable());
    Ok(())
}

pub fn contract_get_storage_context(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let contract = ctx.pop_contract()?;
    let sc = StorageContext::new(contract.script_hash());
    ctx.push(InteropValue::StorageContext(sc));
    Ok(())
}

/// Whether the account's deployed code is a standard single-signature
/// verification script (or empty, for plain accounts).
pub fn account_is_standard(ctx: &mut SyscallCtx<'_, '_>) -> Result<(), InteropError> {
    let bytes = ctx.pop_bytes()?;
    let hash =
        Hash160::from_bytes(&bytes).map_err(|_| InteropError::BadParameterLength(bytes.len()))?;
    let contract = ctx.run.view.contract_at(&hash, ctx.run.height)?;
    ctx.push(contract.script.is_empty() || is_signature_script(&contract.script));
    Ok(())
}

fn is_signature_script(script: &[u8]) -> bool {
    script.len() == 35 && script[0] == 33 && script[34] == opcode::CHECKSIG
}
