//! Prometheus metrics for the query subsystem.
//!
//! Grounded in the teacher's `MetricsRegistry`/`ConsensusMetrics` pair
//! (a `Registry` wrapped alongside strongly-typed metric structs, each
//! registered through a `register` constructor), scoped down to what
//! this crate actually emits: query counts by variant, decode failures
//! by codec, and evaluation latency. Unlike the teacher, no HTTP
//! exporter lives here — `query-gateway` serves `/metrics` itself, over
//! the same listener as the rest of its API, rather than standing up a
//! second one the way the teacher's standalone `hyper` server does.

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};

/// Query-subsystem Prometheus metrics.
#[derive(Clone)]
pub struct QueryMetrics {
    pub queries_total: IntCounterVec,
    pub decode_failures_total: IntCounterVec,
    pub eval_seconds: Histogram,
}

impl QueryMetrics {
    fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
        let queries_total = IntCounterVec::new(
            Opts::new("queries_total", "Total queries evaluated, by variant"),
            &["variant"],
        )?;
        registry.register(Box::new(queries_total.clone()))?;

        let decode_failures_total = IntCounterVec::new(
            Opts::new(
                "decode_failures_total",
                "Total query decode failures, by codec",
            ),
            &["codec"],
        )?;
        registry.register(Box::new(decode_failures_total.clone()))?;

        let eval_seconds = Histogram::with_opts(
            HistogramOpts::new("query_eval_seconds", "Time to evaluate a query, in seconds")
                .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
        )?;
        registry.register(Box::new(eval_seconds.clone()))?;

        Ok(QueryMetrics {
            queries_total,
            decode_failures_total,
            eval_seconds,
        })
    }
}

/// Wrapper around a Prometheus registry and the metrics it owns. Cheap to
/// clone and share; every field is itself an `Arc`-backed Prometheus
/// handle.
#[derive(Clone)]
pub struct MetricsRegistry {
    registry: Registry,
    pub query: QueryMetrics,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("ledger".to_string()), None)?;
        let query = QueryMetrics::register(&registry)?;
        Ok(MetricsRegistry { registry, query })
    }

    /// Encodes all registered metrics into the Prometheus text exposition
    /// format.
    pub fn gather_text(&self) -> String {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::warn!("failed to encode prometheus metrics: {e}");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}
