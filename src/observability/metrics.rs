//! Metrics collection and exposition.
//!
//! # Metrics
//! - `bot_claims_total` (counter): claim attempts by outcome
//! - `bot_holdings_results_total` (counter): resolver results by kind
//! - `bot_role_syncs_total` (counter): role sync passes by result
//! - `bot_events_total` (counter): dispatched inbound events by handler

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_claim_outcome(outcome: &str) {
    counter!("bot_claims_total", "outcome" => outcome.to_string()).increment(1);
}

pub fn record_holdings_result(kind: &str) {
    counter!("bot_holdings_results_total", "kind" => kind.to_string()).increment(1);
}

pub fn record_role_sync(success: bool) {
    let result = if success { "ok" } else { "failed" };
    counter!("bot_role_syncs_total", "result" => result).increment(1);
}

pub fn record_dispatch(handler: &str) {
    counter!("bot_events_total", "handler" => handler.to_string()).increment(1);
}
