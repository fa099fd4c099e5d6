use serde::Serialize;

use crate::model::settings::GammaSettings;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GammaValue {
    Evaluated(f64),
    Excluded,
}

impl GammaValue {
    pub fn value(self) -> Option<f64> {
        match self {
            GammaValue::Evaluated(v) => Some(v),
            GammaValue::Excluded => None,
        }
    }

    pub fn is_excluded(self) -> bool {
        matches!(self, GammaValue::Excluded)
    }

    pub fn passes(self) -> bool {
        matches!(self, GammaValue::Evaluated(v) if v <= 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GammaResult {
    pub settings: GammaSettings,
    pub values: Vec<GammaValue>,
    pub evaluated: usize,
    pub passed: usize,
    pub pass_rate: f64,
}

impl GammaResult {
    pub fn from_values(settings: GammaSettings, values: Vec<GammaValue>) -> Self {
        let mut evaluated = 0usize;
        let mut passed = 0usize;
        for v in &values {
            if v.is_excluded() {
                continue;
            }
            evaluated += 1;
            if v.passes() {
                passed += 1;
            }
        }
        let pass_rate = if evaluated == 0 {
            0.0
        } else {
            passed as f64 / evaluated as f64
        };
        Self {
            settings,
            values,
            evaluated,
            passed,
            pass_rate,
        }
    }

    pub fn evaluated_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(|v| v.value()).collect()
    }

    pub fn excluded(&self) -> usize {
        self.values.len() - self.evaluated
    }
}
