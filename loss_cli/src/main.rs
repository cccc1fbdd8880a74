//! # Prestress Loss CLI
//!
//! Runs the loss engine on a girder scenario described in JSON.
//!
//! ```text
//! loss_cli template > girder.json
//! loss_cli template --criteria > criteria.json
//! loss_cli compute girder.json --criteria criteria.json --points 11
//! loss_cli compute girder.json --format json --output losses.json -vv
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use loss_core::losses::{EvaluationContext, LossEngine, Milestone, PrestressLosses};
use loss_core::status::{StatusItem, StatusLog, StatusReporter};
use loss_core::{
    load_criteria, load_scenario, save_results, GirderScenario, LossComputationError, LossCriteria,
    LossDetails, LossError, LossResult,
};

/// Prestress loss calculator for precast girders
#[derive(Parser, Debug)]
#[command(name = "loss_cli", version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute losses along a girder
    Compute(ComputeArgs),
    /// Print a sample scenario (or default criteria) as JSON
    Template {
        /// Print the default loss criteria instead of a scenario
        #[arg(long)]
        criteria: bool,
    },
}

#[derive(Parser, Debug)]
struct ComputeArgs {
    /// Girder scenario file (JSON)
    #[arg(value_name = "SCENARIO")]
    scenario: PathBuf,

    /// Loss criteria file (JSON); defaults are used when omitted
    #[arg(short, long, env = "LOSS_CRITERIA")]
    criteria: Option<PathBuf>,

    /// Number of evenly spaced points of interest
    #[arg(short = 'n', long, default_value_t = 11)]
    points: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Write results to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

/// Outcome at one point of interest
#[derive(Debug, Serialize)]
struct PointReport {
    distance_from_start: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    losses: Option<LossDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<LossComputationError>,
}

#[derive(Debug, Serialize)]
struct ComputeReport<'a> {
    scenario: &'a str,
    criteria: &'a LossCriteria,
    points: Vec<PointReport>,
    status: Vec<StatusItem>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Compute(args) => compute(&args),
        Commands::Template { criteria } => template(criteria),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn template(criteria: bool) -> LossResult<()> {
    let json = if criteria {
        serde_json::to_string_pretty(&LossCriteria::default())
    } else {
        serde_json::to_string_pretty(&GirderScenario::template())
    }
    .map_err(|e| LossError::SerializationError { reason: e.to_string() })?;
    println!("{}", json);
    Ok(())
}

fn compute(args: &ComputeArgs) -> LossResult<()> {
    let scenario = load_scenario(&args.scenario)?;
    let criteria = match &args.criteria {
        Some(path) => load_criteria(path)?,
        None => LossCriteria::default(),
    };
    info!(scenario = %scenario.name, method = %criteria.loss_method, "loaded inputs");

    let status = StatusLog::new();
    let mut engine = LossEngine::new(scenario.context(&criteria));
    let points = evaluate_points(&mut engine, &scenario, args.points, &status);
    debug!(points = points.len(), status = status.len(), "computation finished");

    let report = ComputeReport {
        scenario: &scenario.name,
        criteria: &criteria,
        points,
        status: status.items(),
    };

    match (args.format, &args.output) {
        (OutputFormat::Json, Some(path)) => save_results(&report, path)?,
        (OutputFormat::Json, None) => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| LossError::SerializationError { reason: e.to_string() })?;
            println!("{}", json);
        }
        (OutputFormat::Human, Some(path)) => {
            std::fs::write(path, render_human(&report)).map_err(|e| {
                LossError::file_error("write", path.display().to_string(), e.to_string())
            })?;
        }
        (OutputFormat::Human, None) => print!("{}", render_human(&report)),
    }
    Ok(())
}

/// Evaluate evenly spaced points, reporting each diagnostic once
fn evaluate_points(
    engine: &mut LossEngine<'_>,
    scenario: &GirderScenario,
    count: usize,
    status: &dyn StatusReporter,
) -> Vec<PointReport> {
    let prepared = engine.prepare_segment(&scenario.segment);
    if let Err(e) = &prepared {
        status.report(StatusItem::from_error(e));
    }

    let eval = EvaluationContext::analysis();
    scenario
        .points(count)
        .iter()
        .map(|poi| {
            // A failed preparation fails every point the same way
            let outcome = match &prepared {
                Ok(()) => engine.compute_and_report(poi, &eval, status),
                Err(e) => Err(e.clone()),
            };
            match outcome {
                Ok(details) => PointReport {
                    distance_from_start: poi.distance_from_start,
                    losses: Some(details),
                    error: None,
                },
                Err(e) => PointReport {
                    distance_from_start: poi.distance_from_start,
                    losses: None,
                    error: Some(e),
                },
            }
        })
        .collect()
}

fn render_human(report: &ComputeReport<'_>) -> String {
    let mut out = String::new();
    out.push_str("═══════════════════════════════════════════════════════════════════════\n");
    out.push_str(&format!("  PRESTRESS LOSSES: {}\n", report.scenario));
    out.push_str(&format!(
        "  {} ({})\n",
        report.criteria.loss_method,
        report.criteria.edition.display_name()
    ));
    out.push_str("═══════════════════════════════════════════════════════════════════════\n\n");
    out.push_str("   x (ft)    fpj     ΔfpR0    ΔfpES   ΔfpLT(f)  fpe(deck)  fpe(f)  fpe(f+LL)\n");
    out.push_str("  ───────  ──────  ───────  ───────  ────────  ─────────  ──────  ─────────\n");
    for point in &report.points {
        let x_ft = point.distance_from_start / 12.0;
        match (&point.losses, &point.error) {
            (Some(d), _) => out.push_str(&format!(
                "  {:>7.2}  {:>6.1}  {:>7.2}  {:>7.2}  {:>8.2}  {:>9.2}  {:>6.2}  {:>9.2}\n",
                x_ft,
                d.jacking_stress(),
                d.relaxation_before_transfer(),
                d.elastic_shortening(),
                d.time_dependent_loss(Milestone::Final),
                d.effective_prestress(Milestone::BeforeDeckPlacement),
                d.effective_prestress(Milestone::Final),
                d.final_effective_prestress(),
            )),
            (None, Some(e)) => {
                out.push_str(&format!("  {:>7.2}  [FAIL] {}\n", x_ft, e.reason_code()))
            }
            (None, None) => {}
        }
    }
    out.push('\n');

    if report.status.is_empty() {
        out.push_str("Status: no diagnostics\n");
    } else {
        out.push_str("Status:\n");
        for item in &report.status {
            out.push_str(&format!(
                "  [{:?}] {}: {}\n",
                item.severity, item.reason_code, item.message
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use loss_core::criteria::FcgpPolicy;
    use loss_core::materials::ConcreteType;

    #[test]
    fn test_preparation_failure_reported_once() {
        let mut scenario = GirderScenario::template();
        scenario.release_concrete.concrete_type = ConcreteType::PciUhpc;
        scenario.girder_concrete.concrete_type = ConcreteType::PciUhpc;
        let criteria = LossCriteria {
            loss_method: loss_core::LossMethod::RefinedTxDot2013,
            fcgp_policy: FcgpPolicy::AssumedStress,
            ..LossCriteria::default()
        };
        let status = StatusLog::new();
        let mut engine = LossEngine::new(scenario.context(&criteria));

        let points = evaluate_points(&mut engine, &scenario, 5, &status);
        assert_eq!(points.len(), 5);
        assert!(points.iter().all(|p| p.losses.is_none() && p.error.is_some()));
        assert_eq!(status.len(), 1);
    }

    #[test]
    fn test_clean_run_reports_nothing() {
        let scenario = GirderScenario::template();
        let criteria = LossCriteria::default();
        let status = StatusLog::new();
        let mut engine = LossEngine::new(scenario.context(&criteria));

        let points = evaluate_points(&mut engine, &scenario, 3, &status);
        assert!(points.iter().all(|p| p.losses.is_some()));
        assert!(status.is_empty());

        let report = ComputeReport {
            scenario: &scenario.name,
            criteria: &criteria,
            points,
            status: status.items(),
        };
        let text = render_human(&report);
        assert!(text.contains("no diagnostics"));
    }
}
