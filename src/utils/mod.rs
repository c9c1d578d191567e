//! Utility helpers: math extensions, random sampling, logging, and profiling.

pub mod logging;
pub mod math;
pub mod profiling;
pub mod random;

pub use math::*;
pub use profiling::StepProfiler;
pub use random::WindRng;
