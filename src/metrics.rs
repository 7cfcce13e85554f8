//! Prometheus metrics for the goal-to-order pipeline.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use tracing::debug;

/// Goal-to-batch-settled latency metric name.
pub const METRIC_GOAL_LATENCY: &str = "goal_to_orders_latency_ms";
/// Order submission latency metric name.
pub const METRIC_ORDER_SUBMIT_LATENCY: &str = "order_submit_latency_ms";
/// Catalog resolution latency metric name.
pub const METRIC_CATALOG_RESOLVE_LATENCY: &str = "catalog_resolve_latency_ms";
/// Orders accepted counter metric name.
pub const METRIC_ORDERS_SUBMITTED: &str = "orders_submitted_total";
/// Orders rejected counter metric name.
pub const METRIC_ORDERS_REJECTED: &str = "orders_rejected_total";
/// Orders timed out counter metric name.
pub const METRIC_ORDERS_TIMED_OUT: &str = "orders_timed_out_total";
/// Opportunities selected counter metric name.
pub const METRIC_OPPORTUNITIES_SELECTED: &str = "opportunities_selected_total";
/// Connected observers gauge metric name.
pub const METRIC_OBSERVERS_CONNECTED: &str = "observers_connected";

/// Register metric descriptions. Call once at startup.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_GOAL_LATENCY,
        "Latency from goal command to settled order batch in milliseconds"
    );
    describe_histogram!(
        METRIC_ORDER_SUBMIT_LATENCY,
        "Single order submission latency in milliseconds"
    );
    describe_histogram!(
        METRIC_CATALOG_RESOLVE_LATENCY,
        "Event catalog resolution latency in milliseconds"
    );

    describe_counter!(METRIC_ORDERS_SUBMITTED, "Total orders accepted by the venue");
    describe_counter!(METRIC_ORDERS_REJECTED, "Total orders rejected or failed");
    describe_counter!(METRIC_ORDERS_TIMED_OUT, "Total orders abandoned at the deadline");
    describe_counter!(
        METRIC_OPPORTUNITIES_SELECTED,
        "Total opportunities selected across goal events"
    );

    describe_gauge!(METRIC_OBSERVERS_CONNECTED, "Currently connected observers");

    debug!("metrics initialized");
}

/// Record goal-to-settled-batch latency.
pub fn record_goal_latency(start: Instant) {
    histogram!(METRIC_GOAL_LATENCY).record(start.elapsed().as_secs_f64() * 1000.0);
}

/// Record single order submission latency.
pub fn record_order_submit_latency(start: Instant) {
    histogram!(METRIC_ORDER_SUBMIT_LATENCY).record(start.elapsed().as_secs_f64() * 1000.0);
}

/// Record catalog resolution latency.
pub fn record_catalog_resolve_latency(start: Instant) {
    histogram!(METRIC_CATALOG_RESOLVE_LATENCY).record(start.elapsed().as_secs_f64() * 1000.0);
}

/// Increment the accepted-orders counter.
pub fn inc_orders_submitted() {
    counter!(METRIC_ORDERS_SUBMITTED).increment(1);
}

/// Increment the rejected-orders counter.
pub fn inc_orders_rejected() {
    counter!(METRIC_ORDERS_REJECTED).increment(1);
}

/// Increment the timed-out-orders counter.
pub fn inc_orders_timed_out() {
    counter!(METRIC_ORDERS_TIMED_OUT).increment(1);
}

/// Add to the selected-opportunities counter.
pub fn add_opportunities_selected(count: usize) {
    counter!(METRIC_OPPORTUNITIES_SELECTED).increment(count as u64);
}

/// Set the connected-observers gauge.
pub fn set_observers_connected(count: usize) {
    gauge!(METRIC_OBSERVERS_CONNECTED).set(count as f64);
}

/// RAII guard that records a latency histogram when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Elapsed time in milliseconds without recording.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(self.metric_name).record(self.start.elapsed().as_secs_f64() * 1000.0);
    }
}
