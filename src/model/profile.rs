use serde::{Deserialize, Serialize};

use crate::error::GammaError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DosePoint {
    pub position: f64,
    pub dose: f64,
}

impl DosePoint {
    pub fn new(position: f64, dose: f64) -> Self {
        Self { position, dose }
    }
}

/// 1D dose distribution sampled at strictly increasing positions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoseProfile {
    points: Vec<DosePoint>,
}

impl DoseProfile {
    pub fn new(points: Vec<DosePoint>) -> Result<Self, GammaError> {
        for (i, p) in points.iter().enumerate() {
            if !p.position.is_finite() || !p.dose.is_finite() {
                return Err(GammaError::InvalidProfile(format!(
                    "sample {i} is not finite (position={}, dose={})",
                    p.position, p.dose
                )));
            }
            if i > 0 && p.position <= points[i - 1].position {
                return Err(GammaError::InvalidProfile(format!(
                    "positions must be strictly increasing (sample {i}: {} after {})",
                    p.position,
                    points[i - 1].position
                )));
            }
        }
        Ok(Self { points })
    }

    pub fn from_columns(positions: &[f64], doses: &[f64]) -> Result<Self, GammaError> {
        if positions.len() != doses.len() {
            return Err(GammaError::InvalidProfile(format!(
                "{} positions but {} doses",
                positions.len(),
                doses.len()
            )));
        }
        let points = positions
            .iter()
            .zip(doses)
            .map(|(&position, &dose)| DosePoint { position, dose })
            .collect();
        Self::new(points)
    }

    // Callers guarantee ordering; used by the generators.
    pub(crate) fn from_points_unchecked(points: Vec<DosePoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[DosePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.position)
    }

    pub fn doses(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.dose)
    }

    pub fn max_dose(&self) -> f64 {
        let mut max = f64::NEG_INFINITY;
        for p in &self.points {
            if p.dose > max {
                max = p.dose;
            }
        }
        if max.is_finite() { max } else { 0.0 }
    }

    pub fn same_positions(&self, other: &DoseProfile) -> bool {
        self.len() == other.len()
            && self
                .points
                .iter()
                .zip(&other.points)
                .all(|(a, b)| a.position == b.position)
    }
}

/// Linear interpolation over samples ordered by their x coordinate.
///
/// Values left of the first sample or right of the last one are clamped to
/// the boundary samples.
pub fn interpolate_linear<T>(samples: &[T], x: f64, coords: impl Fn(&T) -> (f64, f64)) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let upper = samples.partition_point(|s| coords(s).0 <= x);
    if upper == 0 {
        return coords(&samples[0]).1;
    }
    if upper == samples.len() {
        return coords(&samples[samples.len() - 1]).1;
    }
    let (x0, y0) = coords(&samples[upper - 1]);
    let (x1, y1) = coords(&samples[upper]);
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/profile.rs"]
mod tests;
