//! Fixed timestep accumulator

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Turns variable frame times into a whole number of fixed ticks
#[derive(Debug, Clone)]
pub struct FixedStep {
    accumulator: f32,
    dt: f32,
    max_substeps: u32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStep {
    pub fn new(dt: f32, max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            dt,
            max_substeps,
        }
    }

    /// Add elapsed wall time (seconds) and return how many ticks to run
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= self.dt && substeps < self.max_substeps {
            self.accumulator -= self.dt;
            substeps += 1;
        }
        substeps
    }

    /// Seconds until the next tick is due
    pub fn until_next(&self) -> f32 {
        (self.dt - self.accumulator).max(0.0)
    }
}
