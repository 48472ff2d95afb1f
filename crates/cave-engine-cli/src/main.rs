use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use cave_engine::config::{DEFAULT_ENDPOINT, DEFAULT_REGION, DEFAULT_TIMEOUT_SECS};
use cave_engine::{
    classify, predict, report_rows, sort_latest_first, CaveError, DisplayZone, Forecast,
    ForecastView, HttpSource, JsonSource, ReportSource, SourceConfig,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Exit status when there is not enough data to predict.
const EXIT_NO_PREDICTION: u8 = 2;

#[derive(Parser)]
#[command(name = "pigcave", version, about = "Predict the next Golden Pig Cave opening")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Read the report feed from a file instead of the network ("-" for stdin)
    #[arg(short, long, global = true)]
    input: Option<PathBuf>,

    /// Report feed URL
    #[arg(long, global = true, env = "PIGCAVE_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Region queried on the feed
    #[arg(long, global = true, env = "PIGCAVE_REGION", default_value = DEFAULT_REGION)]
    region: String,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "PIGCAVE_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// IANA time zone for displayed times (defaults to the local zone)
    #[arg(long, global = true, env = "PIGCAVE_TZ")]
    timezone: Option<String>,

    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Show the last closing time and the predicted opening window (default)
    Predict,
    /// Show every fetched report with its score, latest first
    Reports,
}

#[derive(Serialize)]
struct PredictOutput {
    local: ForecastView,
    utc: Forecast,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<CaveError>() {
            Some(cave) if cave.is_insufficient_data() => {
                eprintln!("Cannot predict: {cave}");
                ExitCode::from(EXIT_NO_PREDICTION)
            }
            _ => {
                eprintln!("Error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cave_engine={level},pigcave={level}")));

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(io::stderr().is_terminal());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let zone = match &cli.timezone {
        Some(name) => DisplayZone::parse(name)?,
        None => DisplayZone::Local,
    };
    let source = build_source(cli)?;

    match cli.command.unwrap_or(Command::Predict) {
        Command::Predict => run_predict(source.as_ref(), zone, cli.json),
        Command::Reports => run_reports(source.as_ref(), zone, cli.json),
    }
}

fn build_source(cli: &Cli) -> Result<Box<dyn ReportSource>> {
    if let Some(path) = &cli.input {
        if path.as_os_str() == "-" {
            tracing::debug!("reading reports from stdin");
        } else {
            tracing::debug!(path = %path.display(), "reading reports from file");
        }
        let body = read_input(path)?;
        return Ok(Box::new(JsonSource::new(body)));
    }

    let config = SourceConfig {
        endpoint: cli.endpoint.clone(),
        region: cli.region.clone(),
        timeout: Duration::from_secs(cli.timeout_secs),
        ..Default::default()
    };
    tracing::debug!(endpoint = %config.endpoint, region = %config.region, "using live report feed");
    Ok(Box::new(HttpSource::new(config)?))
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut body = String::new();
        io::stdin()
            .read_to_string(&mut body)
            .context("Failed to read stdin")?;
        Ok(body)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))
    }
}

fn run_predict(source: &dyn ReportSource, zone: DisplayZone, json: bool) -> Result<()> {
    let prediction = predict(source)?;
    let view = ForecastView::new(&prediction.forecast, zone);

    if json {
        let output = PredictOutput {
            local: view,
            utc: prediction.forecast,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Last closing time:              {}", view.last_close);
        println!("Predicted next open time:       {}", view.predicted_open);
        println!(
            "Predicted next open timeframe:  {} - {}",
            view.window_start, view.window_end
        );
    }
    Ok(())
}

fn run_reports(source: &dyn ReportSource, zone: DisplayZone, json: bool) -> Result<()> {
    let mut classified = classify(&source.fetch_reports()?);
    sort_latest_first(&mut classified);
    let rows = report_rows(&classified, zone);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{:<16}  {:<6}  {:>9}  {:>8}  {:>6}  {}",
        "Timestamp", "Status", "Votes Yes", "Votes No", "Score", "Reliable"
    );
    for row in &rows {
        println!(
            "{:<16}  {:<6}  {:>9}  {:>8}  {:>6}  {}",
            row.timestamp,
            row.status,
            row.yes_count,
            row.no_count,
            row.score,
            if row.reliable { "yes" } else { "no" }
        );
    }
    Ok(())
}
