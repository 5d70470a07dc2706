use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{WrapErr, bail};
use costrisk::util::io::atomic_write;
use costrisk::{AnalysisWorker, Scenario, ScenarioReport, WorkerResponse, init_logging, render_text};
use costrisk_core::config::DEFAULT_CONFIDENCE_LEVEL;
use costrisk_core::{AuditRecord, EstimateSummary};

#[derive(Parser, Debug)]
#[command(name = "costrisk")]
#[command(about = "Monte Carlo cost-risk analysis for construction estimates")]
struct Args {
    /// Scenario YAML files to analyze
    #[arg(required = true)]
    scenarios: Vec<PathBuf>,

    /// Override the iteration count of every scenario
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Override the random seed of every scenario
    #[arg(short, long)]
    seed: Option<u64>,

    /// Percentile used for the contingency summary
    #[arg(short, long, default_value_t = DEFAULT_CONFIDENCE_LEVEL)]
    confidence_level: f64,

    /// Print JSON instead of a text report
    #[arg(long)]
    json: bool,

    /// Write a replayable audit record per scenario to <data-dir>/audit/
    #[arg(long)]
    audit: bool,

    /// Skip the remaining scenarios after the first rejected one
    #[arg(long)]
    fail_fast: bool,

    /// Write logs to <data-dir>/costrisk.log instead of stderr
    #[arg(long)]
    log_file: bool,

    /// Path to the data directory (default: ~/.costrisk/)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".costrisk")
}

fn write_audit(data_dir: &Path, scenario: &Scenario, record: &AuditRecord) -> color_eyre::Result<()> {
    let path = data_dir.join("audit").join(scenario.audit_file_name());
    let json = record.to_json()?;
    atomic_write(&path, &json)
        .wrap_err_with(|| format!("failed to write audit record {}", path.display()))?;
    tracing::info!("Audit record written to {}", path.display());
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.clone().unwrap_or_else(default_data_dir);

    let _log_guard = init_logging(args.log_file.then_some(data_dir.as_path()), &args.log_level)?;

    if !(args.confidence_level > 0.0 && args.confidence_level < 1.0) {
        bail!(
            "confidence level must be strictly between 0 and 1, got {}",
            args.confidence_level
        );
    }

    let mut scenarios = Vec::with_capacity(args.scenarios.len());
    for path in &args.scenarios {
        let mut scenario = Scenario::load(path)?;
        scenario.apply_overrides(args.iterations, args.seed, args.confidence_level);
        scenarios.push(scenario);
    }

    let total = scenarios.len();
    let worker = AnalysisWorker::new();
    for scenario in scenarios {
        if !worker.send(scenario) {
            bail!("analysis worker stopped unexpectedly");
        }
    }

    let mut failed = Vec::new();
    let mut json_reports = Vec::new();
    for _ in 0..total {
        let Some(response) = worker.recv() else {
            bail!("analysis worker stopped unexpectedly");
        };

        match response {
            WorkerResponse::Complete { scenario, result } => {
                let summary = EstimateSummary::from_result(&result, args.confidence_level);

                if args.json {
                    json_reports.push(serde_json::to_value(ScenarioReport {
                        scenario: &scenario.name,
                        result: &result,
                        summary: summary.as_ref(),
                    })?);
                } else {
                    println!("{}", render_text(&scenario.name, &result, summary.as_ref()));
                }

                if args.audit {
                    let record = AuditRecord::new(scenario.request.clone(), *result);
                    write_audit(&data_dir, &scenario, &record)?;
                }
            }
            WorkerResponse::Error { name, error } => {
                eprintln!("{name}: [{}] {error}", error.code());
                failed.push(name);
                if args.fail_fast {
                    worker.cancel();
                }
            }
            WorkerResponse::Cancelled { name } => {
                tracing::warn!("Scenario '{name}' was cancelled");
                failed.push(name);
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&json_reports)?);
    }

    tracing::info!("Finished {} of {total} scenarios", worker.completed());

    if !failed.is_empty() {
        bail!("{} of {total} scenarios failed: {}", failed.len(), failed.join(", "));
    }
    Ok(())
}
