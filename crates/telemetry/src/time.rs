// Path: crates/telemetry/src/time.rs
use crate::sinks::GovernanceMetricsSink;
use std::time::Instant;

/// Observes the elapsed time of an end-block sweep when dropped.
///
/// The measurement only feeds metrics; it never influences state.
pub struct Timer<'a> {
    sink: &'a dyn GovernanceMetricsSink,
    start: Instant,
}

impl<'a> Timer<'a> {
    /// Starts timing.
    pub fn new(sink: &'a dyn GovernanceMetricsSink) -> Self {
        Self {
            sink,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer<'_> {
    fn drop(&mut self) {
        self.sink
            .observe_end_block_duration(self.start.elapsed().as_secs_f64());
    }
}
