// Path: crates/host/tests/harness.rs
//! End-to-end runs of the reference interpreter against a mock chain
//! view, checking the properties the harness guarantees: locally
//! answered syscalls make no remote queries, overlay writes shadow the
//! adapter, and every remote or script failure is a FAULT in the report
//! rather than a crash.

use std::cell::Cell;
use std::collections::HashMap;

use dryrun_chain::ChainView;
use dryrun_types::error::ChainError;
use dryrun_types::{hash160, Block, Contract, Hash160, Hash256, Header, Transaction, TxWitness};
use dryrun_vm::opcode;

use dryrun_host::{Runner, WitnessSet};

#[derive(Default)]
struct MockChain {
    remote_calls: Cell<usize>,
    block_count: u64,
    storage: HashMap<String, Vec<u8>>,
    headers: HashMap<u32, Header>,
    hashes: HashMap<u32, Hash256>,
    blocks: HashMap<Hash256, Block>,
    contracts: HashMap<Hash160, Contract>,
    storage_malformed: bool,
}

impl MockChain {
    fn new(block_count: u64) -> Self {
        Self {
            block_count,
            ..Self::default()
        }
    }

    fn bump(&self) {
        self.remote_calls.set(self.remote_calls.get() + 1);
    }

    fn missing<T>(&self, what: &str) -> Result<T, ChainError> {
        Err(ChainError::MalformedResponse(format!("no fixture: {what}")))
    }
}

impl ChainView for MockChain {
    fn block_count(&self) -> Result<u64, ChainError> {
        Ok(self.block_count)
    }

    fn block_by_hash(&self, hash: &Hash256) -> Result<Block, ChainError> {
        self.bump();
        match self.blocks.get(hash) {
            Some(b) => Ok(b.clone()),
            None => self.missing("block"),
        }
    }

    fn header_by_hash(&self, _hash: &Hash256) -> Result<Header, ChainError> {
        self.bump();
        self.missing("header by hash")
    }

    fn header_by_height(&self, height: u32) -> Result<Header, ChainError> {
        self.bump();
        match self.headers.get(&height) {
            Some(h) => Ok(h.clone()),
            None => self.missing("header by height"),
        }
    }

    fn hash_by_height(&self, height: u32) -> Result<Hash256, ChainError> {
        self.bump();
        match self.hashes.get(&height) {
            Some(h) => Ok(*h),
            None => self.missing("hash by height"),
        }
    }

    fn contract_at(&self, hash: &Hash160, _height: u32) -> Result<Contract, ChainError> {
        self.bump();
        match self.contracts.get(hash) {
            Some(c) => Ok(c.clone()),
            None => self.missing("contract"),
        }
    }

    fn storage_at(&self, db_key: &str, _height: u32) -> Result<Vec<u8>, ChainError> {
        self.bump();
        if self.storage_malformed {
            return Err(ChainError::MalformedResponse("odd hex digits".into()));
        }
        match self.storage.get(db_key) {
            Some(v) => Ok(v.clone()),
            None => self.missing("storage"),
        }
    }

    fn transaction_by_hash(&self, _hash: &Hash256) -> Result<Transaction, ChainError> {
        self.bump();
        self.missing("transaction")
    }
}

fn syscall(script: &mut Vec<u8>, name: &str) {
    script.push(opcode::SYSCALL);
    script.push(name.len() as u8);
    script.extend_from_slice(name.as_bytes());
}

fn push_data(script: &mut Vec<u8>, data: &[u8]) {
    assert!(!data.is_empty() && data.len() <= 75);
    script.push(data.len() as u8);
    script.extend_from_slice(data);
}

fn sample_header(index: u32) -> Header {
    Header {
        version: 0,
        prev_hash: Hash256([0x10; 32]),
        merkle_root: Hash256([0x20; 32]),
        timestamp: 1_500_000_000 + index,
        index,
        consensus_data: 7,
        next_consensus: Hash160([0x30; 20]),
        witness: TxWitness::default(),
    }
}

#[test]
fn get_height_is_answered_without_remote_queries() {
    let mock = MockChain::new(43);
    let runner = Runner::pin(&mock, WitnessSet::default()).unwrap();
    assert_eq!(runner.height(), 42);
    mock.remote_calls.set(0);

    for name in ["System.Blockchain.GetHeight", "Neo.Blockchain.GetHeight"] {
        let mut script = Vec::new();
        syscall(&mut script, name);
        let report = runner.run(&script, 1_000_000_000);
        assert_eq!(report.state, "HALT", "{name}");
        assert_eq!(report.stack.len(), 1);
        assert_eq!(report.stack[0].kind, "Integer");
        assert_eq!(report.stack[0].value, serde_json::json!("42"));
        assert_eq!(mock.remote_calls.get(), 0, "{name}");
    }
}

#[test]
fn get_height_gas_is_one_price_unit() {
    let mock = MockChain::new(10);
    let runner = Runner::pin(&mock, WitnessSet::default()).unwrap();
    let mut script = Vec::new();
    syscall(&mut script, "System.Blockchain.GetHeight");
    let report = runner.run(&script, 1_000_000_000);
    assert_eq!(report.gas_consumed, "0.00100000");
}

#[test]
fn storage_get_miss_makes_exactly_one_remote_query() {
    let mut script = Vec::new();
    push_data(&mut script, b"answer");
    syscall(&mut script, "System.Storage.GetContext");
    syscall(&mut script, "System.Storage.Get");

    let script_hash = hash160(&script);
    let db_key = format!("{}{}", script_hash.to_hex(), hex::encode(b"answer"));

    let mut mock = MockChain::new(5);
    mock.storage.insert(db_key, vec![0x2a]);
    let runner = Runner::pin(&mock, WitnessSet::default()).unwrap();
    mock.remote_calls.set(0);

    let report = runner.run(&script, 1_000_000_000);
    assert_eq!(report.state, "HALT");
    assert_eq!(report.stack[0].kind, "ByteArray");
    assert_eq!(report.stack[0].value, serde_json::json!("2a"));
    assert_eq!(mock.remote_calls.get(), 1);
}

#[test]
fn overlay_put_then_get_never_touches_the_adapter() {
    // Put pops context, key, value: push value first, key above it.
    let mut script = Vec::new();
    push_data(&mut script, b"value");
    push_data(&mut script, b"key");
    syscall(&mut script, "System.Storage.GetContext");
    syscall(&mut script, "System.Storage.Put");
    push_data(&mut script, b"key");
    syscall(&mut script, "System.Storage.GetContext");
    syscall(&mut script, "System.Storage.Get");

    let mock = MockChain::new(5);
    let runner = Runner::pin(&mock, WitnessSet::default()).unwrap();
    mock.remote_calls.set(0);

    let report = runner.run(&script, 1_000_000_000_000);
    assert_eq!(report.state, "HALT");
    assert_eq!(report.stack[0].value, serde_json::json!(hex::encode(b"value")));
    assert_eq!(mock.remote_calls.get(), 0);
}

#[test]
fn delete_shadows_remote_state_with_a_tombstone() {
    let mut script = Vec::new();
    push_data(&mut script, b"key");
    syscall(&mut script, "System.Storage.GetContext");
    syscall(&mut script, "System.Storage.Delete");
    push_data(&mut script, b"key");
    syscall(&mut script, "System.Storage.GetContext");
    syscall(&mut script, "System.Storage.Get");

    let script_hash_key = |script: &[u8]| {
        format!("{}{}", hash160(script).to_hex(), hex::encode(b"key"))
    };
    let mut mock = MockChain::new(5);
    mock.storage.insert(script_hash_key(&script), b"remote".to_vec());
    let runner = Runner::pin(&mock, WitnessSet::default()).unwrap();
    mock.remote_calls.set(0);

    let report = runner.run(&script, 1_000_000_000_000);
    assert_eq!(report.state, "HALT");
    // Tombstone: empty byte string, no remote read.
    assert_eq!(report.stack[0].value, serde_json::json!(""));
    assert_eq!(mock.remote_calls.get(), 0);
}

#[test]
fn read_only_context_put_faults() {
    let mut script = Vec::new();
    push_data(&mut script, b"value");
    push_data(&mut script, b"key");
    syscall(&mut script, "System.Storage.GetReadOnlyContext");
    syscall(&mut script, "System.Storage.Put");

    let mock = MockChain::new(5);
    let runner = Runner::pin(&mock, WitnessSet::default()).unwrap();
    let report = runner.run(&script, 1_000_000_000_000);
    assert_eq!(report.state, "FAULT");
    assert_eq!(report.fault.as_deref(), Some("VM_SYSCALL_FAULT"));
}

#[test]
fn malformed_remote_response_faults_the_script_only() {
    let mut script = Vec::new();
    push_data(&mut script, b"key");
    syscall(&mut script, "System.Storage.GetContext");
    syscall(&mut script, "System.Storage.Get");

    let mut mock = MockChain::new(5);
    mock.storage_malformed = true;
    let runner = Runner::pin(&mock, WitnessSet::default()).unwrap();

    let report = runner.run(&script, 1_000_000_000);
    assert_eq!(report.state, "FAULT");
    assert_eq!(report.fault.as_deref(), Some("VM_SYSCALL_FAULT"));
    // Gas for the work done so far is still reported.
    assert_ne!(report.gas_consumed, "0.00000000");
}

#[test]
fn check_witness_accepts_declared_hash_and_rejects_others() {
    let declared = Hash160([0x77; 20]);
    let mock = MockChain::new(5);
    let runner = Runner::pin(&mock, WitnessSet::new([declared])).unwrap();

    let mut yes = Vec::new();
    push_data(&mut yes, &[0x77; 20]);
    syscall(&mut yes, "System.Runtime.CheckWitness");
    let report = runner.run(&yes, 1_000_000_000);
    assert_eq!(report.state, "HALT");
    assert_eq!(report.stack[0].value, serde_json::json!(true));

    let mut no = Vec::new();
    push_data(&mut no, &[0x78; 20]);
    syscall(&mut no, "Neo.Runtime.CheckWitness");
    let report = runner.run(&no, 1_000_000_000);
    assert_eq!(report.state, "HALT");
    assert_eq!(report.stack[0].value, serde_json::json!(false));
}

#[test]
fn block_lookup_by_index_resolves_hash_first() {
    let block_hash = Hash256([0xbb; 32]);
    let mut mock = MockChain::new(5);
    mock.hashes.insert(1, block_hash);
    mock.blocks.insert(
        block_hash,
        Block {
            header: sample_header(1),
            transactions: Vec::new(),
        },
    );
    let runner = Runner::pin(&mock, WitnessSet::default()).unwrap();
    mock.remote_calls.set(0);

    let mut script = vec![opcode::PUSH1];
    syscall(&mut script, "System.Blockchain.GetBlock");
    syscall(&mut script, "System.Block.GetTransactionCount");
    let report = runner.run(&script, 1_000_000_000);
    assert_eq!(report.state, "HALT");
    assert_eq!(report.stack[0].value, serde_json::json!("0"));
    // One query for the hash, one for the block.
    assert_eq!(mock.remote_calls.get(), 2);
}

#[test]
fn runtime_get_time_reads_the_pinned_header() {
    let mut mock = MockChain::new(8);
    mock.headers.insert(7, sample_header(7));
    let runner = Runner::pin(&mock, WitnessSet::default()).unwrap();

    let mut script = Vec::new();
    syscall(&mut script, "Neo.Runtime.GetTime");
    let report = runner.run(&script, 1_000_000_000);
    assert_eq!(report.state, "HALT");
    assert_eq!(
        report.stack[0].value,
        serde_json::json!((1_500_000_000u32 + 7).to_string())
    );
}

#[test]
fn unregistered_syscall_is_an_unknown_syscall_fault() {
    let mock = MockChain::new(5);
    let runner = Runner::pin(&mock, WitnessSet::default()).unwrap();
    let mut script = Vec::new();
    syscall(&mut script, "Neo.Asset.Create");
    let report = runner.run(&script, 1_000_000_000_000);
    assert_eq!(report.state, "FAULT");
    assert_eq!(report.fault.as_deref(), Some("VM_UNKNOWN_SYSCALL"));
}

#[test]
fn platform_and_trigger_constants() {
    let mock = MockChain::new(5);
    let runner = Runner::pin(&mock, WitnessSet::default()).unwrap();

    let mut script = Vec::new();
    syscall(&mut script, "System.Runtime.Platform");
    syscall(&mut script, "System.Runtime.GetTrigger");
    let report = runner.run(&script, 1_000_000_000);
    assert_eq!(report.state, "HALT");
    assert_eq!(report.stack[0].value, serde_json::json!("16")); // 0x10
    assert_eq!(report.stack[1].value, serde_json::json!(hex::encode(b"NEO")));
}
