//! fuzzytherm: command-line driver for the fuzzy thermostat.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │   LogEventSink (EventSink)        MonotonicClock (Clock)       │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            ThermalController (pure logic)              │    │
//! │  │  FSM · Inference · Plant · History                     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  ControlPacer (tick-driven) · run_batch (rerun-driven)         │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use log::info;

use fuzzytherm::adapters::log_sink::LogEventSink;
use fuzzytherm::adapters::time::MonotonicClock;
use fuzzytherm::app::commands::AppCommand;
use fuzzytherm::config::{AmbientMode, ControllerConfig, InitialTemperature};
use fuzzytherm::scheduler::{ControlPacer, run_batch};
use fuzzytherm::ThermalController;

/// How control ticks are triggered.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Wall-clock paced at the configured control period.
    Paced,
    /// As fast as possible, one tick per call.
    Batch,
}

#[derive(Parser, Debug)]
#[command(name = "fuzzytherm")]
#[command(about = "Fuzzy-logic thermostat driving a simulated room")]
#[command(version)]
struct Args {
    /// JSON configuration file (defaults are used when absent)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value = "batch")]
    mode: Mode,

    /// Ticks to run
    #[arg(short, long, default_value = "240")]
    steps: u64,

    /// Target temperature (overrides the config)
    #[arg(short, long)]
    target: Option<f64>,

    /// Initial temperature (overrides the initial policy)
    #[arg(short, long)]
    initial: Option<f64>,

    /// Seed for the random initial temperature
    #[arg(long)]
    seed: Option<u64>,

    /// Start in winter ambient mode
    #[arg(long)]
    winter: bool,

    /// Log every Nth tick at info level
    #[arg(long, default_value = "10")]
    log_every: u64,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<ControllerConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => ControllerConfig::default(),
    };

    if let Some(target) = args.target {
        config.target_temperature = target;
    }
    if let Some(seed) = args.seed {
        match &mut config.initial_temperature {
            InitialTemperature::Random { seed: s, .. } => *s = Some(seed),
            InitialTemperature::Fixed(_) => {
                log::warn!("--seed ignored: initial temperature is fixed");
            }
        }
    }
    if args.winter {
        config.ambient.mode = AmbientMode::Winter;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let config = load_config(&args)?;
    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }
    if args.steps == 0 {
        bail!("--steps must be at least 1");
    }

    info!("fuzzytherm v{}", env!("CARGO_PKG_VERSION"));

    let control_period_ms = config.control_period_ms;
    let poll_period_ms = config.poll_period_ms;
    let mut controller =
        ThermalController::configure(config).context("invalid controller configuration")?;
    let mut sink = LogEventSink::with_tick_every(args.log_every);

    controller.handle_command(
        AppCommand::Start {
            initial: args.initial,
            target: None,
        },
        &mut sink,
    )?;

    let ticks = match args.mode {
        Mode::Batch => run_batch(&mut controller, args.steps, &mut sink),
        Mode::Paced => {
            let clock = MonotonicClock::new();
            let mut pacer = ControlPacer::new(control_period_ms);
            let poll = Duration::from_millis(u64::from(poll_period_ms.max(1)));
            let mut ticks = 0;
            while ticks < args.steps && controller.is_running() {
                if pacer.poll(&clock) {
                    controller.step(&mut sink)?;
                    ticks += 1;
                }
                std::thread::sleep(poll);
            }
            ticks
        }
    };

    controller.stop(&mut sink);
    let snapshot = controller.snapshot();
    info!(
        "Ran {} ticks: T={:.2} target={:.1} last action {}",
        ticks, snapshot.current_temperature, snapshot.target_temperature, snapshot.last_action
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }
    Ok(())
}
