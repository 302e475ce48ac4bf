//! # Office Runtime
//!
//! ```text
//! office-runtime simulate --config configs/collinear.toml [--json]
//! office-runtime send --config configs/collinear.toml A 29 1
//! ```
//!
//! `simulate` launches the scenario, starts headquarters, sends every
//! package and prints a per-office summary. `send` delivers one package and
//! exits 0 on DELIVERED, 1 on LOST.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gps_office::{EventKind, Location};
use office_runtime::{
    ConsoleListener, Customer, Headquarters, OutputFormat, ScenarioConfig, Simulation,
};
use tokio::task::JoinSet;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Greedy geographic package routing between office nodes
#[derive(Parser, Debug)]
#[command(name = "office-runtime")]
#[command(about = "Run a mesh of GPS offices and route packages through it")]
struct Cli {
    /// Log filter when RUST_LOG is unset (e.g. "info", "gps_office=debug")
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Launch a scenario, send its packages and report per-office stats
    Simulate {
        /// Scenario file
        #[arg(short, long)]
        config: PathBuf,

        /// Print events as JSON lines
        #[arg(long)]
        json: bool,

        /// Seconds to wait for each package's terminal event
        #[arg(long, default_value_t = 300)]
        timeout: u64,
    },

    /// Send one package and wait for it
    Send {
        /// Scenario file
        #[arg(short, long)]
        config: PathBuf,

        /// Office receiving the package from the customer
        origin: String,

        #[arg(allow_negative_numbers = true)]
        x: f64,

        #[arg(allow_negative_numbers = true)]
        y: f64,

        /// Seconds to wait for the terminal event
        #[arg(long, default_value_t = 300)]
        timeout: u64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log_level) {
        eprintln!("error: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log filter {level:?}"))?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn run(command: Command) -> Result<ExitCode> {
    match command {
        Command::Simulate {
            config,
            json,
            timeout,
        } => simulate(config, json, Duration::from_secs(timeout)).await,
        Command::Send {
            config,
            origin,
            x,
            y,
            timeout,
        } => send(config, &origin, x, y, Duration::from_secs(timeout)).await,
    }
}

async fn simulate(path: PathBuf, json: bool, patience: Duration) -> Result<ExitCode> {
    let scenario = ScenarioConfig::load(&path)
        .with_context(|| format!("loading scenario {}", path.display()))?;
    let mut simulation = Simulation::launch(&scenario.offices, &scenario.office)
        .await
        .context("launching offices")?;

    let format = if json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let headquarters = Headquarters::start(
        simulation.directory(),
        Arc::new(ConsoleListener::new(format)),
        scenario.office.notifier_config().lease_duration,
    )
    .await;

    simulation.schedule_faults(&scenario.faults);

    let customer = Customer::new(simulation.directory(), patience);
    let mut sends = JoinSet::new();
    for package in &scenario.packages {
        let destination = ScenarioConfig::destination(package)?;
        let customer = customer.clone();
        let origin = package.origin.clone();
        sends.spawn(async move { customer.send(&origin, destination).await });
    }

    let (mut delivered, mut lost) = (0usize, 0usize);
    while let Some(joined) = sends.join_next().await {
        let report = joined.context("customer task panicked")??;
        match report.outcome {
            EventKind::Delivered => delivered += 1,
            _ => lost += 1,
        }
    }

    // Let headquarters drain the last events before the summary
    tokio::time::sleep(Duration::from_millis(50)).await;
    headquarters.stop();

    println!();
    println!(
        "{:<12} {:>9} {:>9} {:>9} {:>11}",
        "office", "neighbors", "in-flight", "events", "subscribers"
    );
    for stats in simulation.stats() {
        println!(
            "{:<12} {:>9} {:>9} {:>9} {:>11}",
            stats.name,
            stats.neighbor_count,
            stats.in_flight,
            stats.events_published,
            stats.subscriber_count
        );
    }
    println!();
    println!("delivered: {delivered}, lost: {lost}");
    info!(delivered, lost, "Simulation finished");

    simulation.shutdown();
    Ok(ExitCode::SUCCESS)
}

async fn send(path: PathBuf, origin: &str, x: f64, y: f64, patience: Duration) -> Result<ExitCode> {
    let destination = Location::checked(x, y).context("invalid destination")?;
    let scenario = ScenarioConfig::load(&path)
        .with_context(|| format!("loading scenario {}", path.display()))?;
    let mut simulation = Simulation::launch(&scenario.offices, &scenario.office)
        .await
        .context("launching offices")?;
    simulation.schedule_faults(&scenario.faults);

    let report = Customer::new(simulation.directory(), patience)
        .send(origin, destination)
        .await
        .with_context(|| format!("sending from {origin}"))?;

    for event in &report.events {
        println!("{event}");
    }
    simulation.shutdown();

    Ok(if report.delivered() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
