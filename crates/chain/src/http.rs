// Path: crates/chain/src/http.rs
//! JSON-RPC 2.0 client over HTTP POST.
//!
//! One request per query, no pooled retries: a transport failure is
//! [`ChainError::RemoteUnavailable`], anything wrong with the body of a
//! delivered response is [`ChainError::MalformedResponse`]. Requests and
//! responses are logged at debug level for replaying a session by hand.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use log::debug;
use serde_json::{json, Value};

use dryrun_types::chain::io::BinReader;
use dryrun_types::error::ChainError;
use dryrun_types::{Block, Contract, Hash160, Hash256, Header, Transaction};

use crate::view::ChainView;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct HttpChainClient {
    endpoint: String,
    http: reqwest::blocking::Client,
    next_id: AtomicU64,
}

impl HttpChainClient {
    pub fn new(endpoint: &str) -> Result<Self, ChainError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ChainError::RemoteUnavailable(e.to_string()))?;
        Ok(Self {
            endpoint: normalize_endpoint(endpoint),
            http,
            next_id: AtomicU64::new(1),
        })
    }

    fn call(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
            "method": method,
            "params": params,
        });
        debug!("[REQ] {method} {params}");
        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| ChainError::RemoteUnavailable(e.to_string()))?;
        let envelope: Value = response
            .json()
            .map_err(|e| ChainError::MalformedResponse(e.to_string()))?;
        debug!("[RESP] {method} {envelope}");
        if let Some(err) = envelope.get("error").filter(|e| !e.is_null()) {
            return Err(ChainError::MalformedResponse(format!(
                "{method}: remote error {err}"
            )));
        }
        envelope
            .get("result")
            .cloned()
            .ok_or_else(|| ChainError::MalformedResponse(format!("{method}: no result member")))
    }

    fn call_hex(&self, method: &str, params: Value) -> Result<Vec<u8>, ChainError> {
        let result = self.call(method, params)?;
        decode_hex_result(method, &result)
    }
}

impl ChainView for HttpChainClient {
    fn block_count(&self) -> Result<u64, ChainError> {
        let result = self.call("get_count_in_uint64", json!({}))?;
        result
            .as_u64()
            .ok_or_else(|| ChainError::MalformedResponse("block count is not a u64".into()))
    }

    fn block_by_hash(&self, hash: &Hash256) -> Result<Block, ChainError> {
        let raw = self.call_hex("get_block_by_hash_in_hex", json!({ "Hash": hash.to_hex() }))?;
        let mut r = BinReader::new(&raw);
        let block = Block::decode(&mut r)?;
        r.finish()?;
        Ok(block)
    }

    fn header_by_hash(&self, hash: &Hash256) -> Result<Header, ChainError> {
        let raw = self.call_hex("get_header_by_hash_in_hex", json!({ "Hash": hash.to_hex() }))?;
        let mut r = BinReader::new(&raw);
        let header = Header::decode(&mut r)?;
        r.finish()?;
        Ok(header)
    }

    fn header_by_height(&self, height: u32) -> Result<Header, ChainError> {
        let raw = self.call_hex("get_header_by_height_in_hex", json!({ "Height": height }))?;
        let mut r = BinReader::new(&raw);
        let header = Header::decode(&mut r)?;
        r.finish()?;
        Ok(header)
    }

    fn hash_by_height(&self, height: u32) -> Result<Hash256, ChainError> {
        let result = self.call("get_hash_by_height_in_hex", json!({ "Height": height }))?;
        let s = result
            .as_str()
            .ok_or_else(|| ChainError::MalformedResponse("block hash is not a string".into()))?;
        Hash256::from_hex(s).map_err(|e| ChainError::MalformedResponse(e.to_string()))
    }

    fn contract_at(&self, hash: &Hash160, height: u32) -> Result<Contract, ChainError> {
        let raw = self.call_hex(
            "get_contract_by_hash_height_in_hex",
            json!({ "Hash": hash.to_hex(), "Height": height }),
        )?;
        // The node serves the whole state record; its leading record-kind
        // tag byte precedes the contract layout.
        let body = raw
            .get(1..)
            .ok_or_else(|| ChainError::MalformedResponse("empty contract record".into()))?;
        let mut r = BinReader::new(body);
        let contract = Contract::decode(&mut r)?;
        r.finish()?;
        Ok(contract)
    }

    fn storage_at(&self, db_key: &str, height: u32) -> Result<Vec<u8>, ChainError> {
        self.call_hex(
            "get_storage_by_dbkey_height_in_hex",
            json!({ "DBKey": db_key, "Height": height }),
        )
    }

    fn transaction_by_hash(&self, hash: &Hash256) -> Result<Transaction, ChainError> {
        let raw = self.call_hex(
            "get_transaction_by_hash_in_hex",
            json!({ "Hash": hash.to_hex() }),
        )?;
        let mut r = BinReader::new(&raw);
        let tx = Transaction::decode(&mut r)?;
        r.finish()?;
        Ok(tx)
    }
}

fn normalize_endpoint(addr: &str) -> String {
    if addr.starts_with("http://") || addr.starts_with("https://") {
        addr.to_string()
    } else {
        format!("http://{addr}")
    }
}

fn decode_hex_result(method: &str, result: &Value) -> Result<Vec<u8>, ChainError> {
    let s = result
        .as_str()
        .ok_or_else(|| ChainError::MalformedResponse(format!("{method}: result is not hex")))?;
    hex::decode(s).map_err(|e| ChainError::MalformedResponse(format!("{method}: {e}")))
}
