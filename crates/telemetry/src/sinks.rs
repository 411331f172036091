// Path: crates/telemetry/src/sinks.rs
//! Defines abstract traits for metrics reporting, decoupling core logic from the backend.

use once_cell::sync::OnceCell;

// --- Static Sink Access ---

/// A no-op sink for use in tests or when telemetry is disabled.
#[derive(Debug, Clone, Copy)]
pub struct NopSink;

/// A lazily-initialized static reference to the global `MetricsSink` implementation.
pub static SINK: OnceCell<&'static dyn MetricsSink> = OnceCell::new();
static NOP_SINK: NopSink = NopSink;

/// Returns a static reference to the configured error metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn error_metrics() -> &'static dyn ErrorMetricsSink {
    match SINK.get() {
        Some(sink) => sink.as_error_sink(),
        None => &NOP_SINK,
    }
}

/// Returns a static reference to the configured governance metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn governance_metrics() -> &'static dyn GovernanceMetricsSink {
    match SINK.get() {
        Some(sink) => sink.as_governance_sink(),
        None => &NOP_SINK,
    }
}

// --- Trait Definitions ---

/// A sink for recording structured error metrics.
pub trait ErrorMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments a counter for a specific error, categorized by its kind and variant.
    fn inc_error(&self, kind: &'static str, variant: &'static str);
}
impl ErrorMetricsSink for NopSink {
    fn inc_error(&self, _kind: &'static str, _variant: &'static str) {}
}

/// A sink for proposal lifecycle metrics.
pub trait GovernanceMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the counter of submitted proposals, labeled by handler route.
    fn inc_proposals_submitted(&self, route: &str);
    /// Adds an escrowed deposit amount.
    fn inc_deposited(&self, amount: u64);
    /// Increments the counter of recorded votes, labeled by option.
    fn inc_votes(&self, option: &str);
    /// Increments the counter of resolved proposals, labeled by final status.
    fn inc_resolutions(&self, status: &str);
    /// Observes the duration of a single end-block sweep.
    fn observe_end_block_duration(&self, duration_secs: f64);
}
impl GovernanceMetricsSink for NopSink {
    fn inc_proposals_submitted(&self, _route: &str) {}
    fn inc_deposited(&self, _amount: u64) {}
    fn inc_votes(&self, _option: &str) {}
    fn inc_resolutions(&self, _status: &str) {}
    fn observe_end_block_duration(&self, _duration_secs: f64) {}
}

/// A unified supertrait that combines every specialized sink.
pub trait MetricsSink: ErrorMetricsSink + GovernanceMetricsSink {
    /// Views this sink as an `ErrorMetricsSink`.
    fn as_error_sink(&self) -> &dyn ErrorMetricsSink;
    /// Views this sink as a `GovernanceMetricsSink`.
    fn as_governance_sink(&self) -> &dyn GovernanceMetricsSink;
}

// Blanket implementation so any type implementing all sink traits can be
// used as a `MetricsSink`.
impl<T> MetricsSink for T
where
    T: ErrorMetricsSink + GovernanceMetricsSink,
{
    fn as_error_sink(&self) -> &dyn ErrorMetricsSink {
        self
    }
    fn as_governance_sink(&self) -> &dyn GovernanceMetricsSink {
        self
    }
}
