use std::time::Duration;

use log::debug;

/// Per-phase timing of the most recent cloth step.
#[derive(Debug, Default, Clone, Copy)]
pub struct StepProfiler {
    pub external_forces_time: Duration,
    pub constraint_forces_time: Duration,
    pub satisfy_time: Duration,
    pub integrate_time: Duration,
    pub total_step_time: Duration,

    pub particle_count: usize,
    pub constraint_count: usize,
    pub substeps: u32,
}

impl StepProfiler {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn share(&self, phase: Duration) -> f32 {
        let total_us = self.total_step_time.as_micros() as f32;
        if total_us < 1.0 {
            return 0.0;
        }
        phase.as_micros() as f32 / total_us * 100.0
    }

    pub fn report(&self) {
        if self.total_step_time.is_zero() {
            return;
        }

        debug!(
            "cloth step: {:.3} ms, {} particles, {} constraints, {} substeps",
            self.total_step_time.as_secs_f32() * 1000.0,
            self.particle_count,
            self.constraint_count,
            self.substeps
        );
        debug!(
            "  external {:.1}% | constraints {:.1}% | satisfy {:.1}% | integrate {:.1}%",
            self.share(self.external_forces_time),
            self.share(self.constraint_forces_time),
            self.share(self.satisfy_time),
            self.share(self.integrate_time)
        );
    }
}
