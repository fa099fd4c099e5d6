use std::ops::Range;

use crate::error::GammaError;
use crate::model::profile::{DosePoint, DoseProfile};
use crate::pipeline::map_samples;
use crate::pipeline::stage2_resample::{ResampledProfile, resample};

/// Dose matching tolerance of the diagnostic DTA, in dose units.
pub const DTA_MATCH_TOLERANCE: f64 = 0.001;
/// Resample step used to build the diagnostic DTA search space.
pub const DTA_RESAMPLE_STEP: f64 = 0.001;
/// Reported when no resampled reference dose matches within tolerance.
pub const DTA_NO_MATCH: f64 = 10.0;

/// Resampled reference points ordered by dose.
///
/// For a fixed test dose `d`, `d - dose_j` is monotone over this ordering, so
/// every point passing `|d - dose_j| <= tol` sits in one contiguous run.
struct DoseIndex {
    by_dose: Vec<DosePoint>,
}

impl DoseIndex {
    fn new(points: &[DosePoint]) -> Self {
        let mut by_dose = points.to_vec();
        by_dose.sort_by(|a, b| a.dose.total_cmp(&b.dose));
        Self { by_dose }
    }

    fn matching(&self, dose: f64, tolerance: f64) -> &[DosePoint] {
        let range = self.matching_range(dose, tolerance);
        &self.by_dose[range]
    }

    fn matching_range(&self, dose: f64, tolerance: f64) -> Range<usize> {
        let lo = self.by_dose.partition_point(|p| dose - p.dose > tolerance);
        let hi = self.by_dose.partition_point(|p| dose - p.dose >= -tolerance);
        lo..hi
    }
}

/// Distance to agreement of every test sample against the resampled reference.
///
/// Equivalent to scanning the whole resampled reference per test sample and
/// keeping the smallest `|x_test - x_ref|` among points whose dose is within
/// `tolerance`; [`DTA_NO_MATCH`] when nothing matches.
pub fn distance_to_agreement(
    test: &DoseProfile,
    resampled_reference: &ResampledProfile,
    tolerance: f64,
) -> Vec<f64> {
    let index = DoseIndex::new(resampled_reference.points());
    let samples = test.points();
    map_samples(samples.len(), |m| {
        let sample = samples[m];
        index
            .matching(sample.dose, tolerance)
            .iter()
            .map(|p| (sample.position - p.position).abs())
            .reduce(f64::min)
            .unwrap_or(DTA_NO_MATCH)
    })
}

/// DTA of `test` against `reference` resampled at [`DTA_RESAMPLE_STEP`] with
/// [`DTA_MATCH_TOLERANCE`]. Reported next to gamma, never fed into it.
pub fn diagnostic_dta(test: &DoseProfile, reference: &DoseProfile) -> Result<Vec<f64>, GammaError> {
    let resampled = resample(reference, DTA_RESAMPLE_STEP)?;
    Ok(distance_to_agreement(
        test,
        &resampled,
        DTA_MATCH_TOLERANCE,
    ))
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_dta.rs"]
mod tests;
