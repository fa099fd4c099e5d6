use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::model::gamma::GammaValue;
use crate::pipeline::stage4_dta::DTA_NO_MATCH;
use crate::report::json::render_summary_json;
use crate::report::text::render_report_text;
use crate::report::{
    DiagnosticStats, ProfileSource, SummaryData, ToolMeta, VariantSummary, Verdict, format_f64_6,
    gamma_stats, max, median,
};
use crate::scenario::ScenarioOutcome;

pub fn write_reports(
    outcome: &ScenarioOutcome,
    source: &ProfileSource,
    out_dir: &Path,
) -> std::io::Result<SummaryData> {
    fs::create_dir_all(out_dir)?;

    let profiles_path = out_dir.join("profiles.tsv");
    write_profiles_tsv(outcome, &profiles_path)?;

    let summary = build_summary(outcome, source);
    let summary_path = out_dir.join("summary.json");
    write_text(&summary_path, &render_summary_json(&summary)?)?;

    let report_path = out_dir.join("report.txt");
    write_text(&report_path, &render_report_text(&summary))?;

    info!(out_dir = %out_dir.display(), "reports written");
    Ok(summary)
}

pub fn build_summary(outcome: &ScenarioOutcome, source: &ProfileSource) -> SummaryData {
    let n_samples = outcome.pair.test.len();
    let variants = outcome
        .variants
        .iter()
        .map(|v| VariantSummary {
            name: v.name.to_string(),
            description: v.description.to_string(),
            settings: v.result.settings,
            n_samples,
            evaluated: v.result.evaluated,
            excluded: v.result.excluded(),
            passed: v.result.passed,
            pass_rate: v.result.pass_rate,
            gamma: gamma_stats(&v.result.evaluated_values()),
            verdict: Verdict::from_pass_rate(v.result.pass_rate),
        })
        .collect();

    SummaryData {
        tool: ToolMeta {
            name: "kira-gammaqc".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            parallel: cfg!(feature = "parallel"),
        },
        source: source.clone(),
        n_samples,
        reference_max_dose: outcome.pair.reference.max_dose(),
        diagnostics: DiagnosticStats {
            dose_difference_max: max(&outcome.dose_difference),
            dose_difference_median: median(&outcome.dose_difference),
            dta_median: median(&outcome.dta),
            dta_no_match: outcome.dta.iter().filter(|&&d| d == DTA_NO_MATCH).count(),
        },
        variants,
    }
}

fn write_profiles_tsv(outcome: &ScenarioOutcome, path: &Path) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);

    let mut header = vec![
        "position".to_string(),
        "test_dose".to_string(),
        "reference_dose".to_string(),
        "dose_difference".to_string(),
        "dta".to_string(),
    ];
    for v in &outcome.variants {
        header.push(format!("gamma_{}", v.name));
    }
    writeln!(w, "{}", header.join("\t"))?;

    let test = outcome.pair.test.points();
    let reference = outcome.pair.reference.points();
    for n in 0..test.len() {
        let mut row = vec![
            format_f64_6(test[n].position),
            format_f64_6(test[n].dose),
            format_f64_6(reference[n].dose),
            format_f64_6(outcome.dose_difference[n]),
            format_f64_6(outcome.dta[n]),
        ];
        for v in &outcome.variants {
            row.push(format_gamma(v.result.values[n]));
        }
        writeln!(w, "{}", row.join("\t"))?;
    }

    w.flush()
}

fn format_gamma(value: GammaValue) -> String {
    match value {
        GammaValue::Evaluated(g) => format_f64_6(g),
        GammaValue::Excluded => "NA".to_string(),
    }
}

fn write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents.as_bytes())?;
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage6_report.rs"]
mod tests;
