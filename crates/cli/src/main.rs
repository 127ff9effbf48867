// Path: crates/cli/src/main.rs
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! # dryrun
//!
//! Executes one smart-contract script against the live state of a
//! remote node and prints the result document to stdout. Nothing is
//! written back to the chain: storage mutations stay in a run-local
//! overlay, and authorization comes from the witness list given on the
//! command line.

use anyhow::{Context, Result};
use clap::Parser;
use log::error;

use dryrun_chain::HttpChainClient;
use dryrun_host::{Runner, WitnessSet};

#[derive(Parser, Debug)]
#[clap(
    name = "dryrun",
    version,
    about = "Dry-run a smart-contract script against remote chain state."
)]
struct Cli {
    /// Script to execute, hex encoded.
    #[clap(long)]
    script: String,

    /// Gas budget for the run, in raw fixed-point units (8 decimals).
    #[clap(long, default_value_t = 50_000_000_000)]
    gas_limit: i64,

    /// JSON-RPC endpoint of the node to read chain state from.
    #[clap(long)]
    rpc: String,

    /// Colon-separated script hashes treated as having witnessed the run.
    #[clap(long, default_value = "")]
    witnesses: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let script = hex::decode(&cli.script).context("--script is not valid hex")?;
    let witnesses =
        WitnessSet::parse(&cli.witnesses).context("--witnesses must be colon-separated hex script hashes")?;

    let client = HttpChainClient::new(&cli.rpc)?;
    let runner = Runner::pin(&client, witnesses)
        .context("failed to pin execution height on the remote node")?;

    let report = runner.run(&script, cli.gas_limit);
    if let Some(code) = &report.fault {
        error!("script faulted: {code}");
    }
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}
