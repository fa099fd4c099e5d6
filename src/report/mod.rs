pub mod json;
pub mod text;

use serde::Serialize;

use crate::model::penumbra::ProfilePairParams;
use crate::model::settings::GammaSettings;

#[derive(Debug, Clone, Serialize)]
pub struct GammaStats {
    pub median: f64,
    pub p90: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariantSummary {
    pub name: String,
    pub description: String,
    pub settings: GammaSettings,
    pub n_samples: usize,
    pub evaluated: usize,
    pub excluded: usize,
    pub passed: usize,
    pub pass_rate: f64,
    pub gamma: GammaStats,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProfileSource {
    Synthetic(ProfilePairParams),
    File { path: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
    pub parallel: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticStats {
    pub dose_difference_max: f64,
    pub dose_difference_median: f64,
    pub dta_median: f64,
    pub dta_no_match: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub tool: ToolMeta,
    pub source: ProfileSource,
    pub n_samples: usize,
    pub reference_max_dose: f64,
    pub diagnostics: DiagnosticStats,
    pub variants: Vec<VariantSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Acceptable,
    Marginal,
    Failing,
}

impl Verdict {
    pub fn from_pass_rate(rate: f64) -> Self {
        if rate >= 0.95 {
            Verdict::Acceptable
        } else if rate >= 0.90 {
            Verdict::Marginal
        } else {
            Verdict::Failing
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::Acceptable => "acceptable",
            Verdict::Marginal => "marginal",
            Verdict::Failing => "failing",
        }
    }
}

pub fn format_f64_6(v: f64) -> String {
    format!("{:.6}", v)
}

pub fn format_percent(rate: f64) -> String {
    format!("{:.2}%", 100.0 * rate)
}

pub fn quantile_indexed(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    let idx = ((n - 1) as f64 * p).ceil() as usize;
    sorted[idx]
}

pub fn median(values: &[f64]) -> f64 {
    quantile_indexed(values, 0.5)
}

pub fn p90(values: &[f64]) -> f64 {
    quantile_indexed(values, 0.90)
}

pub fn max(values: &[f64]) -> f64 {
    quantile_indexed(values, 1.0)
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn gamma_stats(values: &[f64]) -> GammaStats {
    GammaStats {
        median: median(values),
        p90: p90(values),
        max: max(values),
        mean: mean(values),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
