use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing::info;

use kira_gammaqc::ct::tables::{AttenuationTable, SpectrumTable};
use kira_gammaqc::ct::{HuSurvey, survey_hu};
use kira_gammaqc::input::load_profiles_tsv;
use kira_gammaqc::logging::init_logging;
use kira_gammaqc::model::penumbra::{PenumbraModel, ProfilePairParams};
use kira_gammaqc::model::settings::GammaSettings;
use kira_gammaqc::pipeline::stage1_profiles::generate_profile_pair;
use kira_gammaqc::pipeline::stage6_report::write_reports;
use kira_gammaqc::report::{ProfileSource, format_percent};
use kira_gammaqc::scenario::{run_scenario, single_variant, standard_variants};

#[derive(Debug, Parser)]
#[command(name = "kira-gammaqc")]
#[command(about = "1D gamma index comparison of radiotherapy dose profiles")]
#[command(version)]
struct Cli {
    /// Debug level logging (RUST_LOG still takes precedence).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compare a test and a reference profile under the gamma settings sweep.
    Run(RunArgs),
    /// CT number ranges of materials from attenuation and spectrum tables.
    Hu(HuArgs),
}

#[derive(Debug, Clone, Args)]
struct RunArgs {
    /// Output directory for profiles.tsv, summary.json and report.txt.
    #[arg(long)]
    out: PathBuf,

    /// Columns `position test_dose reference_dose`; synthetic profiles when absent.
    #[arg(long)]
    profiles: Option<PathBuf>,

    #[arg(long, default_value_t = 10.0)]
    field_size: f64,

    #[arg(long, default_value_t = 20.0)]
    width: f64,

    #[arg(long, default_value_t = 256)]
    samples: usize,

    /// Lateral shift of the test profile edge.
    #[arg(long, default_value_t = 0.25, allow_negative_numbers = true)]
    shift: f64,

    /// Dose scaling of the test profile.
    #[arg(long, default_value_t = 1.025)]
    eta: f64,

    #[arg(long, default_value_t = 0.173)]
    penumbra_a: f64,

    #[arg(long, default_value_t = 0.456)]
    penumbra_b1: f64,

    #[arg(long, default_value_t = 2.892)]
    penumbra_b2: f64,

    #[arg(long, default_value_t = 0.01)]
    penumbra_t: f64,

    /// Normalize dose differences by the local reference dose.
    #[arg(long)]
    local: bool,

    #[arg(long, default_value_t = 0.03)]
    dose_criterion: f64,

    #[arg(long, default_value_t = 0.3)]
    dist_criterion: f64,

    #[arg(long, default_value_t = 0.01)]
    resample_step: f64,

    /// Fraction of the max reference dose below which samples are not evaluated.
    #[arg(long, default_value_t = 0.1)]
    threshold: f64,

    /// Only evaluate the given settings, skip the comparison variants.
    #[arg(long)]
    single: bool,
}

#[derive(Debug, Clone, Args)]
struct HuArgs {
    /// JSON mass attenuation tables.
    #[arg(long)]
    materials: PathBuf,

    /// JSON tube spectra.
    #[arg(long)]
    spectra: PathBuf,

    /// Tube voltages to survey; all voltages in the spectrum table when empty.
    #[arg(long = "kvp")]
    kvps: Vec<f64>,

    #[arg(long, default_value_t = 0.0)]
    filter_mm: f64,

    #[arg(long, default_value = "Aluminum")]
    filter_material: String,

    /// Materials to report; every tabulated material when empty.
    #[arg(long = "material")]
    materials_selected: Vec<String>,

    /// Density override as NAME=G_PER_CM3, e.g. Lung=0.25.
    #[arg(long = "force-density")]
    force_density: Vec<String>,

    /// Optional path for a JSON copy of the survey.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(if cli.verbose { "debug" } else { "info" });
    if let Err(err) = run(cli) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Run(args) => run_gamma(&args),
        Commands::Hu(args) => run_hu(&args),
    }
}

fn run_gamma(args: &RunArgs) -> Result<(), String> {
    let settings = settings_from_args(args);
    settings.validate().map_err(|e| e.to_string())?;

    let (pair, source) = match &args.profiles {
        Some(path) => (
            load_profiles_tsv(path).map_err(|e| e.to_string())?,
            ProfileSource::File {
                path: path.display().to_string(),
            },
        ),
        None => {
            let params = profile_params_from_args(args)?;
            (
                generate_profile_pair(&params).map_err(|e| e.to_string())?,
                ProfileSource::Synthetic(params),
            )
        }
    };

    let variants = if args.single {
        single_variant(settings)
    } else {
        standard_variants(settings)
    };
    let outcome = run_scenario(pair, &variants).map_err(|e| e.to_string())?;

    println!("Gamma Index Calculation (1D): Comparison");
    for v in &outcome.variants {
        println!(
            "Gamma Pass Rate ({}): {}",
            v.description,
            format_percent(v.result.pass_rate)
        );
    }

    write_reports(&outcome, &source, &args.out).map_err(|e| e.to_string())?;
    Ok(())
}

fn settings_from_args(args: &RunArgs) -> GammaSettings {
    let base = GammaSettings::default()
        .with_criteria(args.dose_criterion, args.dist_criterion)
        .with_resample_step(args.resample_step)
        .with_threshold(args.threshold);
    if args.local {
        base.with_local_max()
    } else {
        base
    }
}

fn profile_params_from_args(args: &RunArgs) -> Result<ProfilePairParams, String> {
    if args.samples < 2 {
        return Err(format!("--samples must be at least 2 (got {})", args.samples));
    }
    let params = ProfilePairParams {
        field_size: args.field_size,
        width: args.width,
        sample_count: args.samples,
        shift: args.shift,
        eta: args.eta,
        shape: PenumbraModel {
            a: args.penumbra_a,
            b1: args.penumbra_b1,
            b2: args.penumbra_b2,
            t: args.penumbra_t,
        },
    };
    params.validate().map_err(|e| e.to_string())?;
    Ok(params)
}

fn run_hu(args: &HuArgs) -> Result<(), String> {
    let mut attenuation = AttenuationTable::load(&args.materials).map_err(|e| e.to_string())?;
    for entry in &args.force_density {
        let (name, density) = parse_density_override(entry)?;
        attenuation
            .force_density(&name, density)
            .map_err(|e| e.to_string())?;
        info!(material = %name, density, "density override");
    }
    let spectra = SpectrumTable::load(&args.spectra).map_err(|e| e.to_string())?;

    let kvps = if args.kvps.is_empty() {
        spectra.kvps()
    } else {
        args.kvps.clone()
    };
    if kvps.is_empty() {
        return Err("spectrum table is empty".to_string());
    }
    let materials = if args.materials_selected.is_empty() {
        attenuation.names().map(str::to_string).collect()
    } else {
        args.materials_selected.clone()
    };

    let survey = survey_hu(
        &attenuation,
        &spectra,
        &kvps,
        args.filter_mm,
        &args.filter_material,
        &materials,
    )
    .map_err(|e| e.to_string())?;

    print!("{}", render_hu_survey(&survey));

    if let Some(out) = &args.out {
        write_hu_json(&survey, out)?;
    }
    Ok(())
}

fn parse_density_override(arg: &str) -> Result<(String, f64), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("invalid --force-density {arg:?} (use NAME=VALUE)"))?;
    let density = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid density in {arg:?}: {e}"))?;
    Ok((name.trim().to_string(), density))
}

fn render_hu_survey(survey: &HuSurvey) -> String {
    let mut out = String::new();
    out.push_str("CT HU Calculation\n\n");
    out.push_str("Mean Energies\n");
    out.push_str("-------------\n");
    for (kvp, e) in survey.kvps.iter().zip(&survey.mean_energies) {
        out.push_str(&format!("{} kVp: {:.4}\n", kvp, e));
    }
    out.push_str("\nMaterial & Density (g/cm^3), Effective Z\n");
    out.push_str("----------------------------------------\n");
    for m in &survey.materials {
        out.push_str(&format!(
            "{}: {}, {}\n",
            m.material,
            format_optional(m.density),
            format_optional(m.effective_z.map(|z| (z * 1e4).round() / 1e4))
        ));
    }
    out.push_str("\nCT HU By Material\n");
    out.push_str("-----------------\n");
    for m in &survey.materials {
        out.push_str(&format!(
            "{}: {} -> {}\n",
            m.material, m.range.min, m.range.max
        ));
    }
    out
}

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "NA".to_string(), |v| v.to_string())
}

fn write_hu_json(survey: &HuSurvey, path: &Path) -> Result<(), String> {
    let json = serde_json::to_string_pretty(survey).map_err(|e| e.to_string())?;
    std::fs::write(path, json).map_err(|e| e.to_string())?;
    info!(path = %path.display(), "HU survey written");
    Ok(())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
