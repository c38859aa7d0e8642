mod reports;
mod scenarios;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use reports::{generate_console_report, generate_json_report, ScenarioResult};
use scenarios::{get_scenario, SCENARIOS};

#[derive(Debug, Parser)]
#[command(name = "cinekill-tester", version)]
#[command(about = "Automated QA for the cinekill cinematic core - scripted seeded replays")]
struct Args {
    /// Scenarios to run (comma-separated), or "all"
    #[arg(long, default_value = "all")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.list_scenarios {
        println!("{}", "Available scenarios:".bold());
        for scenario in SCENARIOS {
            println!("  {} - {}", scenario.name.cyan(), scenario.description);
        }
        return Ok(());
    }

    println!("{}", "🎬 Cinekill QA Harness".bright_cyan().bold());

    let start_time = Instant::now();
    let names = expand_scenarios(&args.scenarios);
    let seeds = parse_seeds(&args.seeds)?;

    let mut results = Vec::new();
    for name in &names {
        let Some(scenario) = get_scenario(name) else {
            anyhow::bail!(
                "unknown scenario '{name}'; run with --list-scenarios to see the catalog"
            );
        };
        results.push(run_scenario(scenario, &seeds, &args));
    }

    let total_duration = start_time.elapsed();
    write_report(&args, &results, total_duration)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }
    Ok(())
}

fn expand_scenarios(spec: &str) -> Vec<String> {
    if spec.trim() == "all" {
        return SCENARIOS.iter().map(|s| s.name.to_string()).collect();
    }
    spec.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_seeds(spec: &str) -> Result<Vec<u64>> {
    spec.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u64>().with_context(|| format!("invalid seed '{s}'")))
        .collect()
}

fn run_scenario(scenario: &scenarios::Scenario, seeds: &[u64], args: &Args) -> ScenarioResult {
    if args.verbose {
        println!("▶️  {} ({})", scenario.name.bold(), scenario.description);
    }
    let mut failures = Vec::new();
    let mut successes = 0usize;
    let mut total = Duration::ZERO;
    let mut runs = 0usize;

    for &seed in seeds {
        for iteration in 0..args.iterations {
            // Vary the stream per iteration but stay reproducible.
            let run_seed = seed.wrapping_add(iteration as u64);
            let started = Instant::now();
            let outcome = (scenario.run)(run_seed, args.verbose);
            total += started.elapsed();
            runs += 1;
            match outcome {
                Ok(()) => successes += 1,
                Err(err) => {
                    log::warn!("{} failed for seed {run_seed}: {err:#}", scenario.name);
                    failures.push(format!("seed {run_seed}: {err:#}"));
                }
            }
        }
    }

    ScenarioResult {
        scenario_name: scenario.name.to_string(),
        passed: failures.is_empty(),
        iterations_run: runs,
        successful_iterations: successes,
        failures,
        average_duration: if runs > 0 {
            total / u32::try_from(runs).unwrap_or(1)
        } else {
            Duration::ZERO
        },
    }
}

fn write_report(args: &Args, results: &[ScenarioResult], total_duration: Duration) -> Result<()> {
    match args.report.as_str() {
        "json" => {
            let report = generate_json_report(results, total_duration);
            if let Some(path) = &args.output {
                fs::write(path, report).context("writing report file")?;
            } else {
                println!("{report}");
            }
        }
        _ => generate_console_report(results, total_duration),
    }
    Ok(())
}
