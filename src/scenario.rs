use tracing::info;

use crate::error::GammaError;
use crate::model::gamma::GammaResult;
use crate::model::settings::GammaSettings;
use crate::pipeline::stage1_profiles::ProfilePair;
use crate::pipeline::stage3_dose_diff::dose_difference;
use crate::pipeline::stage4_dta::diagnostic_dta;
use crate::pipeline::stage5_gamma::compute_gamma;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioVariant {
    pub name: &'static str,
    pub description: &'static str,
    pub settings: GammaSettings,
}

#[derive(Debug, Clone)]
pub struct VariantOutcome {
    pub name: &'static str,
    pub description: &'static str,
    pub result: GammaResult,
}

#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub pair: ProfilePair,
    pub dose_difference: Vec<f64>,
    pub dta: Vec<f64>,
    pub variants: Vec<VariantOutcome>,
}

impl ScenarioOutcome {
    pub fn variant(&self, name: &str) -> Option<&VariantOutcome> {
        self.variants.iter().find(|v| v.name == name)
    }
}

pub fn single_variant(base: GammaSettings) -> Vec<ScenarioVariant> {
    vec![ScenarioVariant {
        name: "initial",
        description: "Initial",
        settings: base,
    }]
}

/// The comparison sweep: base settings, local normalization, 2 %/2 mm, and a
/// coarse 1.0 resample step.
pub fn standard_variants(base: GammaSettings) -> Vec<ScenarioVariant> {
    vec![
        ScenarioVariant {
            name: "initial",
            description: "Initial",
            settings: base,
        },
        ScenarioVariant {
            name: "local_max",
            description: "Local Max.",
            settings: base.with_local_max(),
        },
        ScenarioVariant {
            name: "criteria_2pct_2mm",
            description: "2 %, 2 mm",
            settings: base.with_global_max().with_criteria(0.02, 0.2),
        },
        ScenarioVariant {
            name: "resample_1x",
            description: "Resample 1x",
            settings: base.with_global_max().with_resample_step(1.0),
        },
    ]
}

pub fn run_scenario(
    pair: ProfilePair,
    variants: &[ScenarioVariant],
) -> Result<ScenarioOutcome, GammaError> {
    let dose_difference = dose_difference(&pair.test, &pair.reference)?;
    let dta = diagnostic_dta(&pair.test, &pair.reference)?;

    let mut outcomes = Vec::with_capacity(variants.len());
    for variant in variants {
        let result = compute_gamma(&pair.test, &pair.reference, &variant.settings)?;
        info!(
            variant = variant.name,
            evaluated = result.evaluated,
            passed = result.passed,
            "Gamma Pass Rate ({}): {:.2}%",
            variant.description,
            100.0 * result.pass_rate
        );
        outcomes.push(VariantOutcome {
            name: variant.name,
            description: variant.description,
            result,
        });
    }

    Ok(ScenarioOutcome {
        pair,
        dose_difference,
        dta,
        variants: outcomes,
    })
}

#[cfg(test)]
#[path = "../tests/src_inline/scenario.rs"]
mod tests;
