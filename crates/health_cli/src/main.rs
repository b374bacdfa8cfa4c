use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use health_scenario::{discover_scenarios, run_path, TraceReport};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Drive health scenarios and inspect their traces")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one scenario file and print its JSON trace.
    Simulate(SimulateArgs),
    /// Run every scenario under a directory and summarize the results.
    Batch(BatchArgs),
    /// Summarize an existing trace report.
    Report(ReportArgs),
}

#[derive(Args)]
struct SimulateArgs {
    #[arg(long)]
    scenario: PathBuf,
    #[arg(long)]
    id: Option<String>,
    /// Also write the trace to this file.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct BatchArgs {
    #[arg(long, default_value = "scenarios")]
    dir: PathBuf,
    /// Directory receiving one JSON trace per scenario.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Args)]
struct ReportArgs {
    #[arg(long)]
    input: PathBuf,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
    let cli = Cli::parse();
    match cli.command {
        Commands::Simulate(args) => handle_simulate(args),
        Commands::Batch(args) => handle_batch(args),
        Commands::Report(args) => handle_report(args),
    }
}

fn handle_simulate(args: SimulateArgs) -> Result<ExitCode> {
    let run_id = args.id.unwrap_or_else(default_run_id);
    let report = run_path(&args.scenario, run_id)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(out) = args.out.as_ref() {
        report.write(out)?;
        eprintln!("Trace written to {}", out.display());
    }
    Ok(exit_code(report.passed()))
}

fn handle_batch(args: BatchArgs) -> Result<ExitCode> {
    let scenarios = discover_scenarios(&args.dir)
        .with_context(|| format!("failed to scan {}", args.dir.display()))?;
    if scenarios.is_empty() {
        warn!(target: "health_cli", dir = %args.dir.display(), "no scenarios found");
    }

    let batch_id = default_run_id();
    let mut all_passed = true;
    for (index, path) in scenarios.iter().enumerate() {
        let report = run_path(path, format!("{batch_id}-{index}"))?;
        all_passed &= report.passed();
        println!("{}", summary_line(&report));

        if let Some(out_dir) = args.out_dir.as_ref() {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| format!("scenario-{index}"));
            report.write(&out_dir.join(format!("{stem}.json")))?;
        }
    }
    println!(
        "{} scenario(s), {}",
        scenarios.len(),
        if all_passed { "all passed" } else { "failures" }
    );
    Ok(exit_code(all_passed))
}

fn handle_report(args: ReportArgs) -> Result<ExitCode> {
    let report = TraceReport::load(&args.input)?;
    println!("{}", summary_line(&report));
    Ok(exit_code(report.passed()))
}

fn summary_line(report: &TraceReport) -> String {
    let label = report
        .name
        .clone()
        .or_else(|| report.scenario.as_ref().map(|p| p.display().to_string()))
        .unwrap_or_else(|| report.id.clone());
    let state = &report.summary.final_state;
    format!(
        "{label} -> {:?} ({} passed, {} failed) health {}/{}",
        report.summary.status,
        report.summary.passed,
        report.summary.failed,
        state.health,
        state.max_health
    )
}

fn default_run_id() -> String {
    format!("run-{}", Utc::now().format("%Y%m%dT%H%M%S"))
}

fn exit_code(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
