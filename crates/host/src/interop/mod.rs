// Path: crates/host/src/interop/mod.rs
//! Syscall registry and handlers.
//!
//! Every operation is registered under its current `System.` name, its
//! legacy `Neo.` name, or both, sharing one handler function per
//! operation so the two namespaces cannot drift apart. Names absent
//! from the catalog dispatch as unknown syscalls and fault the script;
//! that includes operations the chain never implemented beyond a
//! placeholder (asset issuance, contract deployment, storage iteration),
//! whose gas prices survive in the pricing table regardless.
//!
//! A `price_units` of zero marks the entry as dynamically priced (see
//! [`crate::gas`]).

use std::collections::HashMap;

use dryrun_types::error::InteropError;
use dryrun_vm::interop_id;

use crate::context::SyscallCtx;

pub mod accessors;
pub mod blockchain;
pub mod collections;
pub mod engine;
pub mod runtime;
pub mod storage;

pub type SyscallHandler = fn(&mut SyscallCtx<'_, '_>) -> Result<(), InteropError>;

pub struct InteropEntry {
    pub name: &'static str,
    pub id: u32,
    pub price_units: u32,
    pub handler: SyscallHandler,
}

pub struct InteropRegistry {
    entries: Vec<InteropEntry>,
    by_id: HashMap<u32, usize>,
}

#[rustfmt::skip]
const CATALOG: &[(&str, u32, SyscallHandler)] = &[
    // Current namespace.
    ("System.Block.GetTransaction", 1, blockchain::block_get_transaction),
    ("System.Block.GetTransactionCount", 1, blockchain::block_get_transaction_count),
    ("System.Block.GetTransactions", 1, blockchain::block_get_transactions),
    ("System.Blockchain.GetBlock", 200, blockchain::get_block),
    ("System.Blockchain.GetContract", 100, blockchain::get_contract),
    ("System.Blockchain.GetHeader", 100, blockchain::get_header),
    ("System.Blockchain.GetHeight", 1, blockchain::get_height),
    ("System.Blockchain.GetTransaction", 200, blockchain::get_transaction),
    ("System.Blockchain.GetTransactionHeight", 100, blockchain::get_transaction_height),
    ("System.Contract.GetStorageContext", 1, accessors::contract_get_storage_context),
    ("System.ExecutionEngine.GetCallingScriptHash", 1, engine::get_calling_script_hash),
    ("System.ExecutionEngine.GetEntryScriptHash", 1, engine::get_entry_script_hash),
    ("System.ExecutionEngine.GetExecutingScriptHash", 1, engine::get_executing_script_hash),
    ("System.Header.GetHash", 1, accessors::header_get_hash),
    ("System.Header.GetIndex", 1, accessors::header_get_index),
    ("System.Header.GetPrevHash", 1, accessors::header_get_prev_hash),
    ("System.Header.GetTimestamp", 1, accessors::header_get_timestamp),
    ("System.Runtime.CheckWitness", 200, runtime::check_witness),
    ("System.Runtime.Deserialize", 1, runtime::deserialize),
    ("System.Runtime.GetTime", 1, runtime::get_time),
    ("System.Runtime.GetTrigger", 1, runtime::get_trigger),
    ("System.Runtime.Log", 1, runtime::log_message),
    ("System.Runtime.Notify", 1, runtime::notify),
    ("System.Runtime.Platform", 1, runtime::platform),
    ("System.Runtime.Serialize", 1, runtime::serialize),
    ("System.Storage.Delete", 100, storage::delete),
    ("System.Storage.Get", 100, storage::get),
    ("System.Storage.GetContext", 1, storage::get_context),
    ("System.Storage.GetReadOnlyContext", 1, storage::get_read_only_context),
    ("System.Storage.Put", 0, storage::put),
    ("System.Storage.PutEx", 0, storage::put_ex),
    ("System.StorageContext.AsReadOnly", 1, storage::as_read_only),
    ("System.Transaction.GetHash", 1, accessors::tx_get_hash),
    // Legacy namespace.
    ("Neo.Account.IsStandard", 100, accessors::account_is_standard),
    ("Neo.Attribute.GetData", 1, accessors::attribute_get_data),
    ("Neo.Attribute.GetUsage", 1, accessors::attribute_get_usage),
    ("Neo.Block.GetTransaction", 1, blockchain::block_get_transaction),
    ("Neo.Block.GetTransactionCount", 1, blockchain::block_get_transaction_count),
    ("Neo.Block.GetTransactions", 1, blockchain::block_get_transactions),
    ("Neo.Blockchain.GetBlock", 200, blockchain::get_block),
    ("Neo.Blockchain.GetContract", 100, blockchain::get_contract),
    ("Neo.Blockchain.GetHeader", 100, blockchain::get_header),
    ("Neo.Blockchain.GetHeight", 1, blockchain::get_height),
    ("Neo.Blockchain.GetTransaction", 100, blockchain::get_transaction),
    ("Neo.Blockchain.GetTransactionHeight", 100, blockchain::get_transaction_height),
    ("Neo.Contract.GetScript", 1, accessors::contract_get_script),
    ("Neo.Contract.GetStorageContext", 1, accessors::contract_get_storage_context),
    ("Neo.Contract.IsPayable", 1, accessors::contract_is_payable),
    ("Neo.Enumerator.Concat", 1, collections::enumerator_concat),
    ("Neo.Enumerator.Create", 1, collections::enumerator_create),
    ("Neo.Enumerator.Next", 1, collections::enumerator_next),
    ("Neo.Enumerator.Value", 1, collections::enumerator_value),
    ("Neo.Header.GetConsensusData", 1, accessors::header_get_consensus_data),
    ("Neo.Header.GetHash", 1, accessors::header_get_hash),
    ("Neo.Header.GetIndex", 1, accessors::header_get_index),
    ("Neo.Header.GetMerkleRoot", 1, accessors::header_get_merkle_root),
    ("Neo.Header.GetNextConsensus", 1, accessors::header_get_next_consensus),
    ("Neo.Header.GetPrevHash", 1, accessors::header_get_prev_hash),
    ("Neo.Header.GetTimestamp", 1, accessors::header_get_timestamp),
    ("Neo.Header.GetVersion", 1, accessors::header_get_version),
    ("Neo.Input.GetHash", 1, accessors::input_get_hash),
    ("Neo.Input.GetIndex", 1, accessors::input_get_index),
    ("Neo.InvocationTransaction.GetScript", 1, accessors::invocation_tx_get_script),
    ("Neo.Iterator.Concat", 1, collections::iterator_concat),
    ("Neo.Iterator.Create", 1, collections::iterator_create),
    ("Neo.Iterator.Key", 1, collections::iterator_key),
    ("Neo.Iterator.Keys", 1, collections::iterator_keys),
    ("Neo.Iterator.Values", 1, collections::iterator_values),
    ("Neo.Output.GetAssetId", 1, accessors::output_get_asset_id),
    ("Neo.Output.GetScriptHash", 1, accessors::output_get_script_hash),
    ("Neo.Output.GetValue", 1, accessors::output_get_value),
    ("Neo.Runtime.CheckWitness", 200, runtime::check_witness),
    ("Neo.Runtime.Deserialize", 1, runtime::deserialize),
    ("Neo.Runtime.GetTime", 1, runtime::get_time),
    ("Neo.Runtime.GetTrigger", 1, runtime::get_trigger),
    ("Neo.Runtime.Log", 1, runtime::log_message),
    ("Neo.Runtime.Notify", 1, runtime::notify),
    ("Neo.Runtime.Serialize", 1, runtime::serialize),
    ("Neo.Storage.Delete", 100, storage::delete),
    ("Neo.Storage.Get", 100, storage::get),
    ("Neo.Storage.GetContext", 1, storage::get_context),
    ("Neo.Storage.GetReadOnlyContext", 1, storage::get_read_only_context),
    ("Neo.Storage.Put", 0, storage::put),
    ("Neo.StorageContext.AsReadOnly", 1, storage::as_read_only),
    ("Neo.Transaction.GetAttributes", 1, accessors::tx_get_attributes),
    ("Neo.Transaction.GetHash", 1, accessors::tx_get_hash),
    ("Neo.Transaction.GetInputs", 1, accessors::tx_get_inputs),
    ("Neo.Transaction.GetOutputs", 1, accessors::tx_get_outputs),
    ("Neo.Transaction.GetType", 1, accessors::tx_get_type),
    ("Neo.Transaction.GetWitnesses", 200, accessors::tx_get_witnesses),
    ("Neo.Witness.GetVerificationScript", 100, accessors::witness_get_verification_script),
];

impl InteropRegistry {
    pub fn new() -> Self {
        let mut entries = Vec::with_capacity(CATALOG.len());
        let mut by_id = HashMap::with_capacity(CATALOG.len());
        for &(name, price_units, handler) in CATALOG {
            let id = interop_id(name.as_bytes());
            by_id.insert(id, entries.len());
            entries.push(InteropEntry {
                name,
                id,
                price_units,
                handler,
            });
        }
        Self { entries, by_id }
    }

    pub fn lookup(&self, id: u32) -> Option<&InteropEntry> {
        self.by_id.get(&id).map(|&i| &self.entries[i])
    }

    pub fn lookup_name(&self, name: &str) -> Option<&InteropEntry> {
        self.lookup(interop_id(name.as_bytes()))
    }

    pub fn entries(&self) -> &[InteropEntry] {
        &self.entries
    }
}

impl Default for InteropRegistry {
    fn default() -> Self {
        Self::new()
    }
}
