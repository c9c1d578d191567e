use log::{log_enabled, trace, warn, Level};
use std::time::{Duration, Instant};

/// Scoped timer for one solver phase.
///
/// Adds the elapsed time to `output` on drop and traces the phase boundaries.
pub struct ScopedTimer<'a> {
    label: &'static str,
    start: Instant,
    output: &'a mut Duration,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(label: &'static str, output: &'a mut Duration) -> Self {
        if log_enabled!(Level::Trace) {
            trace!("start {label}");
        }
        Self {
            label,
            start: Instant::now(),
            output,
        }
    }
}

impl Drop for ScopedTimer<'_> {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        *self.output += elapsed;
        if log_enabled!(Level::Trace) {
            trace!("end {} ({} µs)", self.label, elapsed.as_micros());
        }
    }
}

/// Registers a warning when a cloth step exceeds its budget.
pub fn warn_if_step_budget_exceeded(duration: Duration, budget_ms: f32) {
    let elapsed_ms = duration.as_secs_f32() * 1000.0;
    if elapsed_ms > budget_ms {
        warn!("cloth step exceeded budget: {elapsed_ms:.2} ms > {budget_ms:.2} ms");
    }
}
