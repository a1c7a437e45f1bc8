use clap::{Parser, ValueEnum};
use drover_highs::Solver;
use drover_model::FileModel;
use serde::Serialize;
use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Drive a solver executable against a pre-written model file"
)]
struct Cli {
    /// Model file passed to the solver as its trailing argument
    #[arg(long)]
    model: PathBuf,

    /// Decision-variable symbol expected in the solution file (repeatable)
    #[arg(long = "var", required = true)]
    vars: Vec<String>,

    /// Solver executable
    #[arg(long, default_value = "highs")]
    executable: PathBuf,

    /// Time limit in seconds forwarded to the solver
    #[arg(long)]
    time_limit: Option<f64>,

    /// Extra solver option as key=value (repeatable)
    #[arg(long = "option")]
    options: Vec<String>,

    /// Interval in milliseconds between solution-file probes
    #[arg(long, default_value_t = 100)]
    poll_interval_ms: u64,

    /// Give up waiting for the solution file after this many seconds
    #[arg(long)]
    wait_timeout_secs: Option<f64>,

    /// Keep scratch files after the solve
    #[arg(long)]
    keep_files: bool,

    /// Directory for per-solve scratch files
    #[arg(long, default_value = "./tmp")]
    scratch_root: PathBuf,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Serialize)]
struct SolveReport {
    status: String,
    status_label: String,
    objective: Option<f64>,
    values: BTreeMap<String, f64>,
    solve_time_seconds: f64,
    polls: u64,
}

/// Enable logging from the `DROVER_TRACE` environment variable; unset
/// means off.
fn init_logging() {
    let filter = match env::var("DROVER_TRACE") {
        Ok(directives) => {
            EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::default())
        }
        Err(_) => EnvFilter::default().add_directive(LevelFilter::OFF.into()),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_option(raw: &str) -> Result<(&str, &str), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim(), value.trim()))
        .ok_or_else(|| format!("invalid option {raw:?}, expected key=value"))
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut model = FileModel::new(&cli.model);
    for var in &cli.vars {
        model = model.decision(var);
    }

    let mut solver = Solver::new(&cli.executable);
    solver.set_scratch_root(&cli.scratch_root);
    solver.set_poll_interval(Duration::from_millis(cli.poll_interval_ms));
    solver.set_keep_files(cli.keep_files);
    if let Some(limit) = cli.time_limit {
        solver.set_time_limit(limit);
    }
    if let Some(secs) = cli.wait_timeout_secs {
        solver.set_wait_timeout(Duration::from_secs_f64(secs));
    }
    for raw in &cli.options {
        let (key, value) = parse_option(raw)?;
        solver.set_option(key, value);
    }

    let solution = solver.solve(&model)?;
    let report = SolveReport {
        status: solution.status().to_string(),
        status_label: solution.status_label().to_string(),
        objective: solution.objective_value(),
        values: solution.values().clone(),
        solve_time_seconds: solution.solve_time_seconds(),
        polls: solution.polls(),
    };

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => {
            println!("status     {} ({})", report.status, report.status_label);
            match report.objective {
                Some(objective) => println!("objective  {objective}"),
                None => println!("objective  -"),
            }
            for (symbol, value) in &report.values {
                println!("{symbol}  {value}");
            }
            println!("solved in  {:.3}s ({} polls)", report.solve_time_seconds, report.polls);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
