//! Query gateway configuration.
//!
//! Only the HTTP listen address is configured here; the block store
//! location comes from `ledger::config::LedgerConfig::default()`.

use std::net::SocketAddr;

/// Configuration for the gateway's HTTP server.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub listen_addr: SocketAddr,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        // Bind to all interfaces so container port mapping works the
        // same way as the teacher's `ApiConfig`.
        let addr: SocketAddr = "0.0.0.0:8081"
            .parse()
            .expect("hard-coded gateway listen address should parse");
        Self { listen_addr: addr }
    }
}
