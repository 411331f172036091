// Path: crates/telemetry/src/prometheus.rs
//! A concrete implementation of the metrics sinks using the Prometheus crate.

use crate::sinks::*;
use once_cell::sync::OnceCell;
use prometheus::{
    exponential_buckets, register_histogram, register_int_counter, register_int_counter_vec,
    Histogram, IntCounter, IntCounterVec,
};

// --- Metric Statics ---
// We use OnceCell to hold the metric collectors. They will be initialized
// exactly once by the `install` function.

static GOV_PROPOSALS_SUBMITTED_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static GOV_DEPOSITED_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static GOV_VOTES_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static GOV_RESOLUTIONS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static GOV_END_BLOCK_DURATION_SECONDS: OnceCell<Histogram> = OnceCell::new();
static ERRORS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();

/// The Prometheus-backed sink returned by [`install`].
#[derive(Debug, Clone, Copy)]
pub struct PrometheusSink;

/// Runs `$body` with the collector if `install()` has been called.
macro_rules! with_metric {
    ($metric:ident, |$m:ident| $body:expr) => {
        if let Some($m) = $metric.get() {
            $body;
        }
    };
}

impl ErrorMetricsSink for PrometheusSink {
    fn inc_error(&self, kind: &'static str, variant: &'static str) {
        with_metric!(ERRORS_TOTAL, |m| m.with_label_values(&[kind, variant]).inc());
    }
}

impl GovernanceMetricsSink for PrometheusSink {
    fn inc_proposals_submitted(&self, route: &str) {
        with_metric!(GOV_PROPOSALS_SUBMITTED_TOTAL, |m| m
            .with_label_values(&[route])
            .inc());
    }
    fn inc_deposited(&self, amount: u64) {
        with_metric!(GOV_DEPOSITED_TOTAL, |m| m.inc_by(amount));
    }
    fn inc_votes(&self, option: &str) {
        with_metric!(GOV_VOTES_TOTAL, |m| m.with_label_values(&[option]).inc());
    }
    fn inc_resolutions(&self, status: &str) {
        with_metric!(GOV_RESOLUTIONS_TOTAL, |m| m.with_label_values(&[status]).inc());
    }
    fn observe_end_block_duration(&self, duration_secs: f64) {
        with_metric!(GOV_END_BLOCK_DURATION_SECONDS, |m| m.observe(duration_secs));
    }
}

fn set_once<T>(cell: &OnceCell<T>, value: T) -> Result<(), prometheus::Error> {
    cell.set(value).map_err(|_| prometheus::Error::AlreadyReg)
}

/// Initializes all Prometheus metrics collectors and returns a static reference to the sink.
///
/// Registers into the default registry. A second call fails with `AlreadyReg`.
pub fn install() -> Result<&'static dyn MetricsSink, prometheus::Error> {
    set_once(
        &GOV_PROPOSALS_SUBMITTED_TOTAL,
        register_int_counter_vec!(
            "agora_governance_proposals_submitted_total",
            "Total proposals submitted, by handler route.",
            &["route"]
        )?,
    )?;
    set_once(
        &GOV_DEPOSITED_TOTAL,
        register_int_counter!(
            "agora_governance_deposited_total",
            "Total amount escrowed as proposal deposits."
        )?,
    )?;
    set_once(
        &GOV_VOTES_TOTAL,
        register_int_counter_vec!(
            "agora_governance_votes_total",
            "Total votes recorded, by option.",
            &["option"]
        )?,
    )?;
    set_once(
        &GOV_RESOLUTIONS_TOTAL,
        register_int_counter_vec!(
            "agora_governance_resolutions_total",
            "Total proposals that reached a terminal status, by status.",
            &["status"]
        )?,
    )?;
    set_once(
        &GOV_END_BLOCK_DURATION_SECONDS,
        register_histogram!(
            "agora_governance_end_block_duration_seconds",
            "Latency of the governance end-block sweeps.",
            exponential_buckets(0.0001, 2.0, 16)?
        )?,
    )?;
    set_once(
        &ERRORS_TOTAL,
        register_int_counter_vec!(
            "agora_errors_total",
            "Total number of errors, categorized by type and variant.",
            &["kind", "variant"]
        )?,
    )?;

    static SINK: PrometheusSink = PrometheusSink;
    Ok(&SINK)
}
