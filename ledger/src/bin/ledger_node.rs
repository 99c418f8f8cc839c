//! Demo node process.
//!
//! Opens a flat-file block store, replays it into an in-memory state
//! view, then evaluates one JSON query per line of stdin and logs a
//! metrics summary on exit.
//!
//! Grounded in the teacher's `chain/src/main.rs`: defaults-only config
//! constructed up front, a metrics registry built before anything else,
//! `tracing` for operational logging. Unlike the teacher's binary this
//! process runs no block producer loop (mutating ledger state is out of
//! scope) and stands up no metrics HTTP exporter of its own — `ledger`
//! has no HTTP dependency at all; `query-gateway` serves `/metrics`.

use std::io::{self, BufRead};
use std::time::Instant;

use clap::Parser;

use ledger::codec::decode_json;
use ledger::config::LedgerConfig;
use ledger::crypto::signature::verify;
use ledger::metrics::MetricsRegistry;
use ledger::query::{evaluate, InMemoryStateView};
use ledger::store::{BlockStore, FlatFileBlockStore};

#[derive(Parser, Debug)]
#[command(about = "Demo ledger query node: evaluates one JSON query per stdin line")]
struct Args {
    /// Flat-file block store directory. Defaults to `LedgerConfig`'s own default.
    #[arg(long)]
    store_dir: Option<std::path::PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "ledger_node=info,ledger=info".to_string()),
        )
        .init();

    let args = Args::parse();
    let mut cfg = LedgerConfig::default();
    if let Some(dir) = args.store_dir {
        cfg.storage.path = dir;
    }

    let store = FlatFileBlockStore::new(cfg.storage.path.clone());
    let blocks = match store.blocks_from(1).collect::<Result<Vec<_>, _>>() {
        Ok(blocks) => blocks,
        Err(e) => {
            tracing::error!(
                "failed to read block store at {}: {e}",
                cfg.storage.path.display()
            );
            std::process::exit(1);
        }
    };
    tracing::info!(blocks = blocks.len(), "loaded block store");
    let state = InMemoryStateView::from_blocks(&blocks);

    let metrics = match MetricsRegistry::new() {
        Ok(m) => m,
        Err(e) => {
            tracing::error!("failed to initialize metrics registry: {e}");
            std::process::exit(1);
        }
    };

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::error!("failed to read stdin: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let start = Instant::now();
        match decode_json(&line) {
            Ok(query) => {
                if let Err(e) =
                    verify(&query.hash(), &query.signature.pubkey, &query.signature.signature)
                {
                    metrics
                        .query
                        .decode_failures_total
                        .with_label_values(&["signature"])
                        .inc();
                    tracing::warn!("signature verification failed: {e}");
                    continue;
                }

                let variant = query.payload.variant_name();
                match evaluate(&query, &store, &state) {
                    Ok(result) => {
                        metrics
                            .query
                            .queries_total
                            .with_label_values(&[variant])
                            .inc();
                        metrics
                            .query
                            .eval_seconds
                            .observe(start.elapsed().as_secs_f64());
                        println!("{result:?}");
                    }
                    Err(e) => tracing::warn!("evaluation failed: {e}"),
                }
            }
            Err(e) => {
                metrics
                    .query
                    .decode_failures_total
                    .with_label_values(&["json"])
                    .inc();
                tracing::warn!("decode failed: {e}");
            }
        }
    }

    tracing::info!("shutting down; final metrics:\n{}", metrics.gather_text());
}
