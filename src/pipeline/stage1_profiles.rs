use tracing::debug;

use crate::error::GammaError;
use crate::model::penumbra::{PenumbraModel, ProfilePairParams};
use crate::model::profile::{DosePoint, DoseProfile};

#[derive(Debug, Clone)]
pub struct ProfilePair {
    pub test: DoseProfile,
    pub reference: DoseProfile,
}

/// Evenly spaced axis starting at `-width/2`, one step short of `+width/2`.
pub fn profile_axis(width: f64, sample_count: usize) -> Vec<f64> {
    (0..sample_count)
        .map(|n| -width / 2.0 + width * (n as f64 / sample_count as f64))
        .collect()
}

/// Samples `eta * dose(x)` of the penumbra model with its edge moved out by `shift`.
///
/// `width` must be finite and positive and `sample_count` at least 1, otherwise
/// the positions are not strictly increasing. [`generate_profile_pair`] checks
/// this through [`ProfilePairParams::validate`].
pub fn generate_profile(
    x0: f64,
    shift: f64,
    eta: f64,
    shape: &PenumbraModel,
    width: f64,
    sample_count: usize,
) -> DoseProfile {
    debug_assert!(
        width.is_finite() && width > 0.0 && sample_count >= 1,
        "profile axis needs width > 0 and at least one sample"
    );
    let edge = x0 + shift;
    let points = profile_axis(width, sample_count)
        .into_iter()
        .map(|x| DosePoint {
            position: x,
            dose: eta * shape.relative_dose(edge, x),
        })
        .collect();
    DoseProfile::from_points_unchecked(points)
}

pub fn generate_profile_pair(params: &ProfilePairParams) -> Result<ProfilePair, GammaError> {
    params.validate()?;
    let x0 = params.half_width();
    let reference = generate_profile(
        x0,
        0.0,
        1.0,
        &params.shape,
        params.width,
        params.sample_count,
    );
    let test = generate_profile(
        x0,
        params.shift,
        params.eta,
        &params.shape,
        params.width,
        params.sample_count,
    );
    debug!(
        samples = params.sample_count,
        shift = params.shift,
        eta = params.eta,
        "generated synthetic profile pair"
    );
    Ok(ProfilePair { test, reference })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_profiles.rs"]
mod tests;
