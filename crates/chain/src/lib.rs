// Path: crates/chain/src/lib.rs
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used, clippy::panic))]
//! Remote chain-state adapter.
//!
//! Everything the harness knows about the chain it learns through the
//! [`ChainView`] trait; [`HttpChainClient`] is the production
//! implementation speaking the node's JSON-RPC 2.0 surface over HTTP
//! POST. Queries are strictly synchronous and never retried.

pub mod http;
pub mod view;

pub use http::HttpChainClient;
pub use view::ChainView;
