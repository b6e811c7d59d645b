//! Metrics collection and exposition.
//!
//! # Metrics
//! - `circuit_breaker_calls_total` (counter): recorded outcomes by breaker name, outcome
//! - `circuit_breaker_state` (gauge): 0=closed, 1=open, 2=half-open
//! - `circuit_breaker_transitions_total` (counter): state changes by breaker name, target state
//! - `rooms_fetch_duration_seconds` (histogram): outbound room call latency
//! - `rooms_fallback_total` (counter): fallback substitutions by reason
//! - `reservations_created_total` (counter)
//!
//! Updates go through the `metrics` facade and are no-ops until a recorder
//! is installed with [`init_metrics`].

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter started");
    Ok(())
}

pub fn record_breaker_call(name: &str, outcome: &'static str) {
    counter!("circuit_breaker_calls_total", "name" => name.to_string(), "outcome" => outcome)
        .increment(1);
}

pub fn record_breaker_state(name: &str, state: u8) {
    gauge!("circuit_breaker_state", "name" => name.to_string()).set(state as f64);
}

pub fn record_breaker_transition(name: &str, to: &'static str) {
    counter!("circuit_breaker_transitions_total", "name" => name.to_string(), "to" => to)
        .increment(1);
}

pub fn record_rooms_fetch(elapsed: Duration) {
    histogram!("rooms_fetch_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_fallback(reason: &'static str) {
    counter!("rooms_fallback_total", "reason" => reason).increment(1);
}

pub fn record_reservation_created() {
    counter!("reservations_created_total").increment(1);
}
