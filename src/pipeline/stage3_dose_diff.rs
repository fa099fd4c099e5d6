use crate::error::GammaError;
use crate::model::profile::DoseProfile;

pub fn dose_difference(test: &DoseProfile, reference: &DoseProfile) -> Result<Vec<f64>, GammaError> {
    ensure_aligned(test, reference)?;
    Ok(test
        .points()
        .iter()
        .zip(reference.points())
        .map(|(t, r)| (t.dose - r.dose).abs())
        .collect())
}

pub(crate) fn ensure_aligned(test: &DoseProfile, reference: &DoseProfile) -> Result<(), GammaError> {
    if test.len() != reference.len() {
        return Err(GammaError::ProfileMismatch(format!(
            "test has {} samples, reference has {}",
            test.len(),
            reference.len()
        )));
    }
    if let Some(i) = test
        .points()
        .iter()
        .zip(reference.points())
        .position(|(t, r)| t.position != r.position)
    {
        return Err(GammaError::ProfileMismatch(format!(
            "positions differ at sample {i} ({} vs {})",
            test.points()[i].position,
            reference.points()[i].position
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_dose_diff.rs"]
mod tests;
