use serde::{Deserialize, Serialize};

use crate::error::GammaError;

/// Two-term error-function penumbra shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenumbraModel {
    pub a: f64,
    pub b1: f64,
    pub b2: f64,
    pub t: f64,
}

impl PenumbraModel {
    /// Fit parameters published by Low et al., Med Phys 25(5), 1998.
    pub fn low_1998() -> Self {
        Self {
            a: 0.173,
            b1: 0.456,
            b2: 2.892,
            t: 0.01,
        }
    }

    pub fn relative_dose(&self, half_width: f64, x: f64) -> f64 {
        let edge = half_width - x.abs();
        self.t
            + (1.0 - self.t)
                * (self.a * phi(self.b1 * edge) + (1.0 - self.a) * phi(self.b2 * edge))
    }
}

impl Default for PenumbraModel {
    fn default() -> Self {
        Self::low_1998()
    }
}

pub fn phi(u: f64) -> f64 {
    (libm::erf(u) + 1.0) / 2.0
}

/// Parameters of a synthetic test/reference profile pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePairParams {
    pub field_size: f64,
    pub width: f64,
    pub sample_count: usize,
    pub shift: f64,
    pub eta: f64,
    pub shape: PenumbraModel,
}

impl Default for ProfilePairParams {
    fn default() -> Self {
        Self {
            field_size: 10.0,
            width: 20.0,
            sample_count: 256,
            shift: 0.25,
            eta: 1.025,
            shape: PenumbraModel::low_1998(),
        }
    }
}

impl ProfilePairParams {
    pub fn half_width(&self) -> f64 {
        0.5 * self.field_size
    }

    pub fn validate(&self) -> Result<(), GammaError> {
        for (name, value) in [("width", self.width), ("field_size", self.field_size)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GammaError::InvalidConfiguration(format!(
                    "{name} must be finite and > 0 (got {value})"
                )));
            }
        }
        if self.sample_count == 0 {
            return Err(GammaError::InvalidConfiguration(
                "sample_count must be at least 1".to_string(),
            ));
        }
        let shape = &self.shape;
        let finite = [
            ("shift", self.shift),
            ("eta", self.eta),
            ("a", shape.a),
            ("b1", shape.b1),
            ("b2", shape.b2),
            ("t", shape.t),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(GammaError::InvalidConfiguration(format!(
                    "{name} must be finite (got {value})"
                )));
            }
        }
        Ok(())
    }
}
