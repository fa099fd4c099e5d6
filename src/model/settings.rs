use serde::{Deserialize, Serialize};

use crate::error::GammaError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GammaSettings {
    pub use_global_max: bool,
    pub dose_criterion: f64,
    pub dist_criterion: f64,
    pub resample_step: f64,
    pub dose_threshold: f64,
}

impl Default for GammaSettings {
    fn default() -> Self {
        Self {
            use_global_max: true,
            dose_criterion: 0.03,
            dist_criterion: 0.3,
            resample_step: 0.01,
            dose_threshold: 0.1,
        }
    }
}

impl GammaSettings {
    pub fn with_local_max(self) -> Self {
        Self {
            use_global_max: false,
            ..self
        }
    }

    pub fn with_global_max(self) -> Self {
        Self {
            use_global_max: true,
            ..self
        }
    }

    pub fn with_criteria(self, dose_criterion: f64, dist_criterion: f64) -> Self {
        Self {
            dose_criterion,
            dist_criterion,
            ..self
        }
    }

    pub fn with_resample_step(self, resample_step: f64) -> Self {
        Self {
            resample_step,
            ..self
        }
    }

    pub fn with_threshold(self, dose_threshold: f64) -> Self {
        Self {
            dose_threshold,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), GammaError> {
        let fields = [
            ("dose_criterion", self.dose_criterion),
            ("dist_criterion", self.dist_criterion),
            ("resample_step", self.resample_step),
            ("dose_threshold", self.dose_threshold),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(GammaError::InvalidConfiguration(format!(
                    "{name} must be finite and > 0 (got {value})"
                )));
            }
        }
        Ok(())
    }

    pub fn label(&self) -> String {
        format!(
            "{} max, {:.0} % / {}, step {}, threshold {:.0} %",
            if self.use_global_max { "global" } else { "local" },
            self.dose_criterion * 100.0,
            self.dist_criterion,
            self.resample_step,
            self.dose_threshold * 100.0
        )
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/settings.rs"]
mod tests;
