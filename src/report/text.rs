use crate::report::{ProfileSource, SummaryData, Verdict, VariantSummary, format_f64_6, format_percent};

pub fn render_report_text(data: &SummaryData) -> String {
    let mut out = String::new();

    out.push_str("Gamma Index Calculation (1D): Comparison\n");
    out.push_str("========================================\n\n");

    out.push_str("1. Profiles\n");
    match &data.source {
        ProfileSource::Synthetic(p) => {
            out.push_str(&format!(
                "Source: synthetic penumbra model (field size {}, width {}, {} samples)\n",
                p.field_size, p.width, p.sample_count
            ));
            out.push_str(&format!(
                "Test perturbation: shift {}, scale {}\n",
                p.shift, p.eta
            ));
        }
        ProfileSource::File { path } => {
            out.push_str(&format!("Source: {}\n", path));
        }
    }
    out.push_str(&format!(
        "Reference max dose: {}\n\n",
        format_f64_6(data.reference_max_dose)
    ));

    out.push_str("2. Diagnostics\n");
    out.push_str(&format!(
        "Dose difference: median {}, max {}\n",
        format_f64_6(data.diagnostics.dose_difference_median),
        format_f64_6(data.diagnostics.dose_difference_max)
    ));
    out.push_str(&format!(
        "DTA median: {} ({} samples without a dose match)\n\n",
        format_f64_6(data.diagnostics.dta_median),
        data.diagnostics.dta_no_match
    ));

    out.push_str("3. Gamma pass rates\n");
    for v in &data.variants {
        out.push_str(&format!(
            "Gamma Pass Rate ({}): {} [{}]\n",
            v.description,
            format_percent(v.pass_rate),
            v.verdict.label()
        ));
    }
    out.push('\n');

    out.push_str("4. Variant details\n");
    for v in &data.variants {
        out.push_str(&format!("{}: {}\n", v.description, v.settings.label()));
        out.push_str(&format!(
            "  evaluated {} of {} ({} below threshold), passed {}\n",
            v.evaluated, v.n_samples, v.excluded, v.passed
        ));
        out.push_str(&format!(
            "  gamma median {}, p90 {}, max {}\n",
            format_f64_6(v.gamma.median),
            format_f64_6(v.gamma.p90),
            format_f64_6(v.gamma.max)
        ));
    }
    out.push('\n');

    out.push_str("5. Conclusion\n");
    out.push_str(&format!("{}\n", conclusion(&data.variants)));

    out
}

fn conclusion(variants: &[VariantSummary]) -> String {
    let Some(first) = variants.first() else {
        return "No gamma evaluation was run.".to_string();
    };
    let mut line = match first.verdict {
        Verdict::Acceptable => "Profiles agree within tolerance.".to_string(),
        Verdict::Marginal => "Agreement is marginal; review the penumbra regions.".to_string(),
        Verdict::Failing => "Profiles do not agree within tolerance.".to_string(),
    };
    let worst = variants.iter().skip(1).min_by(|a, b| a.pass_rate.total_cmp(&b.pass_rate));
    if let Some(w) = worst {
        if w.pass_rate < first.pass_rate {
            line.push_str(&format!(
                " Most sensitive setting: {} ({}).",
                w.description,
                format_percent(w.pass_rate)
            ));
        }
    }
    line
}
