//! Bootstrapping CLI surface.
//!
//! Mirrors `iroha-cli`'s flag surface (`--new-account`, `--grpc` plus
//! `--json-query`, `--torii-port` validated to a `1..=65535` range,
//! etc.) as a thin wrapper around the stub
//! [`ledger::collaborators::KeysManager`]/[`ledger::collaborators::Transport`]
//! collaborators. It demonstrates the flag surface; it does not
//! implement consensus, P2P, or genesis-block bootstrap, which stay out
//! of scope, referenced only by contract.

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use ledger::codec::decode_json;
use ledger::collaborators::{FileKeysManager, KeysManager, LoopbackTransport, Transport};
use ledger::crypto::signature::verify;
use ledger::query::{evaluate, InMemoryStateView};
use ledger::store::{BlockStore, FlatFileBlockStore};

#[derive(Parser, Debug)]
#[command(about = "Bootstrapping CLI for the ledger node")]
struct Cli {
    /// Trusted peers config file for genesis bootstrap (out of scope).
    #[arg(long, default_value = "")]
    config: String,

    /// Genesis block file for network bootstrap (out of scope).
    #[arg(long, default_value = "")]
    genesis_block: String,

    /// Generate a new keypair instead of sending anything.
    #[arg(long)]
    new_account: bool,

    /// Account name, used with `--new-account` and key lookup.
    #[arg(long, default_value = "")]
    name: String,

    /// Pass phrase tagging the generated/looked-up keypair.
    #[arg(long, default_value = "")]
    pass_phrase: String,

    /// Evaluate a transaction/query via the loopback transport (the real
    /// gRPC/Torii transport itself is out of scope; this flag only
    /// selects the "send something" branch, same as the original).
    #[arg(long)]
    grpc: bool,

    /// Address of the ledger node (display only; `LoopbackTransport`
    /// never dials it).
    #[arg(long, default_value = "0.0.0.0")]
    address: String,

    /// Port of the node's query/transaction endpoint.
    #[arg(long, default_value_t = 50051, value_parser = clap::value_parser!(u16).range(1..=65535))]
    torii_port: u16,

    /// Flat-file block store directory to evaluate queries against.
    #[arg(long, default_value = "./data/blocks")]
    store_dir: PathBuf,

    /// Transaction in JSON format (accepted for flag-surface parity; not
    /// evaluated, since mutation of ledger state is out of scope).
    #[arg(long, default_value = "")]
    json_transaction: String,

    /// Query in JSON format.
    #[arg(long, default_value = "")]
    json_query: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "ledger_cli=info".to_string()))
        .init();

    let cli = Cli::parse();

    if cli.new_account {
        run_new_account(&cli);
        return;
    }

    if !cli.config.is_empty() && !cli.genesis_block.is_empty() {
        tracing::error!("genesis bootstrap is out of scope for this node; nothing to do");
        std::process::exit(1);
    }

    if cli.grpc {
        if !cli.json_transaction.is_empty() {
            tracing::warn!("transaction submission is out of scope; ignoring --json-transaction");
        }
        if !cli.json_query.is_empty() {
            run_query(&cli);
            return;
        }
        tracing::error!("--grpc given with neither --json-transaction nor --json-query");
        std::process::exit(1);
    }

    tracing::error!("invalid flags: expected --new-account, or --grpc with --json-query");
    std::process::exit(1);
}

fn run_new_account(cli: &Cli) {
    let keys = FileKeysManager::new(".");
    match keys.generate(&cli.name, &cli.pass_phrase) {
        Ok(pubkey) => tracing::info!(
            pubkey = %pubkey.to_hex(),
            "public and private key have been generated in the current directory"
        ),
        Err(e) => {
            tracing::error!("keys already exist: {e}");
            std::process::exit(1);
        }
    }
}

fn run_query(cli: &Cli) {
    tracing::info!(
        address = %cli.address,
        port = cli.torii_port,
        "evaluating query in-process via loopback transport"
    );

    let query_text = match fs::read_to_string(&cli.json_query) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("failed to read {}: {e}", cli.json_query);
            std::process::exit(1);
        }
    };

    let store = FlatFileBlockStore::new(cli.store_dir.clone());
    let blocks = match store.blocks_from(1).collect::<Result<Vec<_>, _>>() {
        Ok(b) => b,
        Err(e) => {
            tracing::error!("failed to read block store: {e}");
            std::process::exit(1);
        }
    };
    let state = InMemoryStateView::from_blocks(&blocks);

    let transport = LoopbackTransport::new(move |bytes: Vec<u8>| {
        let text = String::from_utf8_lossy(&bytes).into_owned();
        match decode_json(&text) {
            Ok(query) => {
                if let Err(e) = verify(&query.hash(), &query.signature.pubkey, &query.signature.signature) {
                    return format!("signature verification failed: {e}").into_bytes();
                }
                match evaluate(&query, &store, &state) {
                    Ok(result) => format!("{result:?}").into_bytes(),
                    Err(e) => format!("evaluation failed: {e}").into_bytes(),
                }
            }
            Err(e) => format!("decode failed: {e}").into_bytes(),
        }
    });

    let response = transport.send(query_text.into_bytes());
    println!("{}", String::from_utf8_lossy(&response));
}
