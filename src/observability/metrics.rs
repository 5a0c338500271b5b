//! Metrics collection and exposition.
//!
//! # Metrics
//! - `wallet_endpoint_attempts_total` (counter): liveness probes by endpoint, outcome
//! - `wallet_balance_polls_total` (counter): balance queries by outcome
//! - `wallet_funds_received_total` (counter): detected incoming deposits
//! - `wallet_transfers_total` (counter): send attempts by outcome
//! - `wallet_balance_eth` (gauge): last displayed balance

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_endpoint_attempt(endpoint: &str, reachable: bool) {
    let outcome = if reachable { "reachable" } else { "unreachable" };
    metrics::counter!(
        "wallet_endpoint_attempts_total",
        "endpoint" => endpoint.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_balance_poll(ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    metrics::counter!("wallet_balance_polls_total", "outcome" => outcome).increment(1);
}

pub fn record_funds_received() {
    metrics::counter!("wallet_funds_received_total").increment(1);
}

pub fn record_transfer(outcome: &'static str) {
    metrics::counter!("wallet_transfers_total", "outcome" => outcome).increment(1);
}

pub fn record_balance(eth: f64) {
    metrics::gauge!("wallet_balance_eth").set(eth);
}
