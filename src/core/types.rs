use serde::{Deserialize, Serialize};

/// Coefficient class a constraint draws its stiffness and damping from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpringType {
    Tension,
    Compression,
    Shear,
    Bending,
}

/// Stiffness/damping pair used by a single force law.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringCoefficients {
    pub stiffness: f32,
    pub damping: f32,
}

impl SpringCoefficients {
    pub const fn new(stiffness: f32, damping: f32) -> Self {
        Self { stiffness, damping }
    }
}

impl Default for SpringCoefficients {
    fn default() -> Self {
        crate::config::DEFAULT_COEFFICIENTS.tension
    }
}

/// Per-type coefficient lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoefficientTable {
    pub tension: SpringCoefficients,
    pub compression: SpringCoefficients,
    pub shear: SpringCoefficients,
    pub bending: SpringCoefficients,
}

impl Default for CoefficientTable {
    fn default() -> Self {
        crate::config::DEFAULT_COEFFICIENTS
    }
}

impl CoefficientTable {
    pub fn get(&self, ty: SpringType) -> SpringCoefficients {
        match ty {
            SpringType::Tension => self.tension,
            SpringType::Compression => self.compression,
            SpringType::Shear => self.shear,
            SpringType::Bending => self.bending,
        }
    }

    pub fn set(&mut self, ty: SpringType, coefficients: SpringCoefficients) {
        match ty {
            SpringType::Tension => self.tension = coefficients,
            SpringType::Compression => self.compression = coefficients,
            SpringType::Shear => self.shear = coefficients,
            SpringType::Bending => self.bending = coefficients,
        }
    }
}
