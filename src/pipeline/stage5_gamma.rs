use tracing::{debug, warn};

use crate::error::GammaError;
use crate::model::gamma::{GammaResult, GammaValue};
use crate::model::profile::{DosePoint, DoseProfile};
use crate::model::settings::GammaSettings;
use crate::pipeline::map_samples;
use crate::pipeline::stage2_resample::resample;
use crate::pipeline::stage3_dose_diff::ensure_aligned;

/// Nearest point search under the joint dose/distance tolerance ellipse.
struct GammaSearch<'a> {
    candidates: &'a [DosePoint],
    dist_criterion: f64,
    dose_criterion: f64,
    global_norm: Option<f64>,
}

impl GammaSearch<'_> {
    fn dose_term(&self, test_dose: f64, ref_dose: f64) -> f64 {
        let norm = self
            .global_norm
            .unwrap_or(self.dose_criterion * ref_dose);
        let diff = test_dose - ref_dose;
        if norm != 0.0 {
            let b = diff / norm;
            b * b
        } else if diff == 0.0 {
            0.0
        } else {
            f64::INFINITY
        }
    }

    fn squared_at(&self, sample: DosePoint, candidate: DosePoint) -> (f64, f64) {
        let a = (sample.position - candidate.position) / self.dist_criterion;
        let spatial = a * a;
        (spatial, spatial + self.dose_term(sample.dose, candidate.dose))
    }

    /// Smallest squared gamma over all candidates.
    ///
    /// Walks outward from the sample position in both directions and stops a
    /// direction once the spatial term alone exceeds the best value found.
    fn min_squared(&self, sample: DosePoint) -> f64 {
        let start = self
            .candidates
            .partition_point(|p| p.position < sample.position);
        let mut best = f64::INFINITY;
        for &candidate in &self.candidates[start..] {
            let (spatial, total) = self.squared_at(sample, candidate);
            if spatial > best {
                break;
            }
            best = best.min(total);
        }
        for &candidate in self.candidates[..start].iter().rev() {
            let (spatial, total) = self.squared_at(sample, candidate);
            if spatial > best {
                break;
            }
            best = best.min(total);
        }
        best
    }
}

pub fn compute_gamma(
    test: &DoseProfile,
    reference: &DoseProfile,
    settings: &GammaSettings,
) -> Result<GammaResult, GammaError> {
    settings.validate()?;
    if test.is_empty() || reference.is_empty() {
        return Err(GammaError::DegenerateProfile(format!(
            "gamma needs non-empty profiles (test={}, reference={})",
            test.len(),
            reference.len()
        )));
    }
    ensure_aligned(test, reference)?;

    let resampled = resample(reference, settings.resample_step)?;
    let max_dose = reference.max_dose();
    let cutoff = settings.dose_threshold * max_dose;
    let search = GammaSearch {
        candidates: resampled.points(),
        dist_criterion: settings.dist_criterion,
        dose_criterion: settings.dose_criterion,
        global_norm: settings
            .use_global_max
            .then(|| settings.dose_criterion * max_dose),
    };
    debug!(
        samples = test.len(),
        resampled = resampled.len(),
        max_dose,
        cutoff,
        "gamma search space ready"
    );

    let samples = test.points();
    let ref_points = reference.points();
    let values = map_samples(samples.len(), |i| {
        if ref_points[i].dose < cutoff {
            GammaValue::Excluded
        } else {
            GammaValue::Evaluated(search.min_squared(samples[i]).sqrt())
        }
    });

    let result = GammaResult::from_values(*settings, values);
    if result.evaluated == 0 {
        warn!(cutoff, "every sample is below the dose threshold");
    }
    Ok(result)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_gamma.rs"]
mod tests;
