//! Global configuration constants and the tunable [`ClothConfig`].

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::types::{CoefficientTable, SpringCoefficients};

/// Default gravity vector applied to every particle (Y-up).
pub const DEFAULT_GRAVITY: [f32; 3] = [0.0, -9.81, 0.0];

/// Default integration timestep (in seconds).
pub const DEFAULT_TIME_STEP: f32 = 1.0 / 60.0;

/// Number of substeps each `step` call is split into.
pub const DEFAULT_SUBSTEPS: u32 = 1;

/// Radius of the sphere the wind perturbation is sampled from.
pub const WIND_PRESSURE: f32 = 0.05;

/// Cosine threshold for treating two edges around a vertex as a straight line.
pub const DEFAULT_BEND_STRAIGHTNESS: f32 = 0.95;

/// Upper bound on fixed steps taken by a single `ClothEngine::advance` call.
pub const DEFAULT_MAX_STEPS_PER_FRAME: u32 = 8;

/// Seed used when no explicit RNG is handed to the solver.
pub const DEFAULT_SEED: u64 = 0x5eed_c10f;

/// Spring coefficients per spring type.
pub const DEFAULT_COEFFICIENTS: CoefficientTable = CoefficientTable {
    tension: SpringCoefficients::new(0.25, 0.75),
    compression: SpringCoefficients::new(0.25, 0.75),
    shear: SpringCoefficients::new(0.35, 0.65),
    bending: SpringCoefficients::new(0.45, 0.55),
};

/// Runtime settings for one cloth instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClothConfig {
    pub gravity: Vec3,
    pub time_step: f32,
    pub substeps: u32,
    pub coefficients: CoefficientTable,
    /// Adds the accumulated wind vector to particle forces. Off by default:
    /// the wind accumulator is updated every step but has no effect unless set.
    pub apply_wind: bool,
    pub wind_pressure: f32,
    /// Generates bending constraints along nearly straight edge chains.
    pub bending: bool,
    pub bend_straightness: f32,
    /// Maximum spring length as a multiple of rest length, enforced in `satisfy`.
    /// Ratios below 1.0 are discarded when a cloth is built.
    pub stretch_limit: Option<f32>,
    /// Evaluates constraint forces with rayon when the `parallel` feature is on.
    pub parallel: bool,
    pub max_steps_per_frame: u32,
    pub seed: u64,
}

impl Default for ClothConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::from_slice(&DEFAULT_GRAVITY),
            time_step: DEFAULT_TIME_STEP,
            substeps: DEFAULT_SUBSTEPS,
            coefficients: DEFAULT_COEFFICIENTS,
            apply_wind: false,
            wind_pressure: WIND_PRESSURE,
            bending: false,
            bend_straightness: DEFAULT_BEND_STRAIGHTNESS,
            stretch_limit: None,
            parallel: false,
            max_steps_per_frame: DEFAULT_MAX_STEPS_PER_FRAME,
            seed: DEFAULT_SEED,
        }
    }
}

impl ClothConfig {
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_substeps(mut self, substeps: u32) -> Self {
        self.substeps = substeps.max(1);
        self
    }

    pub fn with_bending(mut self, enabled: bool) -> Self {
        self.bending = enabled;
        self
    }

    pub fn with_wind(mut self, enabled: bool) -> Self {
        self.apply_wind = enabled;
        self
    }

    pub fn with_stretch_limit(mut self, limit: Option<f32>) -> Self {
        self.stretch_limit = limit.filter(|ratio| *ratio >= 1.0);
        self
    }

    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
