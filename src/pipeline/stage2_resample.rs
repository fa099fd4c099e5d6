use crate::error::GammaError;
use crate::model::profile::{DosePoint, DoseProfile, interpolate_linear};

/// Fixed-step densification of a profile, rebuilt for every evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampledProfile {
    step: f64,
    points: Vec<DosePoint>,
}

impl ResampledProfile {
    pub fn step(&self) -> f64 {
        self.step
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
}

/// Resamples `profile` every `step` by linear interpolation.
///
/// Positions accumulate as `x += step` from the first original position, and
/// the walk stops once the last emitted position reaches `last - step`. The
/// final original sample is therefore usually not part of the output, and
/// nothing past the last original position is ever emitted.
pub fn resample(profile: &DoseProfile, step: f64) -> Result<ResampledProfile, GammaError> {
    if !step.is_finite() || step <= 0.0 {
        return Err(GammaError::InvalidConfiguration(format!(
            "resample step must be finite and > 0 (got {step})"
        )));
    }
    let original = profile.points();
    if original.len() < 2 {
        return Err(GammaError::DegenerateProfile(format!(
            "resampling needs at least 2 samples (got {})",
            original.len()
        )));
    }

    let first = original[0];
    let last = original[original.len() - 1].position;
    let span = last - first.position;
    let mut points = Vec::with_capacity((span / step) as usize + 2);
    points.push(first);

    let mut x = first.position;
    loop {
        let next = x + step;
        if next > last {
            break;
        }
        x = next;
        points.push(DosePoint {
            position: x,
            dose: interpolate_linear(original, x, |p| (p.position, p.dose)),
        });
        if x >= last - step {
            break;
        }
    }

    Ok(ResampledProfile { step, points })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_resample.rs"]
mod tests;
