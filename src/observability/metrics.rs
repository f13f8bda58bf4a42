//! Metrics collection and exposition.
//!
//! # Metrics
//! - `turnkey_sign_requests_total` (counter): remote signatures by client kind, outcome
//! - `turnkey_sign_duration_seconds` (histogram): remote signing latency
//! - `signer_descriptor_rebuilds_total` (counter): descriptor rebuilds by outcome
//! - `miden_account_resolutions_total` (counter): account bootstrap by outcome

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            describe();
            tracing::info!(address = %addr, "Metrics endpoint listening");
        }
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

fn describe() {
    ::metrics::describe_counter!(
        "turnkey_sign_requests_total",
        "Remote raw-payload signatures by client kind and outcome"
    );
    ::metrics::describe_histogram!(
        "turnkey_sign_duration_seconds",
        "Remote signing latency in seconds"
    );
    ::metrics::describe_counter!(
        "signer_descriptor_rebuilds_total",
        "Signer descriptor rebuilds by outcome"
    );
    ::metrics::describe_counter!(
        "miden_account_resolutions_total",
        "Account bootstrap results by outcome"
    );
}

pub fn record_signing(client: &'static str, ok: bool, start: Instant) {
    let outcome = if ok { "success" } else { "error" };
    ::metrics::counter!("turnkey_sign_requests_total", "client" => client, "outcome" => outcome)
        .increment(1);
    ::metrics::histogram!("turnkey_sign_duration_seconds", "client" => client)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_descriptor_rebuild(outcome: &'static str) {
    ::metrics::counter!("signer_descriptor_rebuilds_total", "outcome" => outcome).increment(1);
}

pub fn record_account_resolution(outcome: &'static str) {
    ::metrics::counter!("miden_account_resolutions_total", "outcome" => outcome).increment(1);
}
