pub mod stage1_profiles;
pub mod stage2_resample;
pub mod stage3_dose_diff;
pub mod stage4_dta;
pub mod stage5_gamma;
pub mod stage6_report;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Per-sample map; samples are independent so the order of evaluation never
/// changes the output.
pub(crate) fn map_samples<T, F>(n: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        (0..n).into_par_iter().map(f).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..n).map(f).collect()
    }
}
