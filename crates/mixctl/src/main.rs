//! mixctl
//!
//! Single-shot mixer control for PulseAudio and PipeWire:
//!
//! 1. Parse arguments (exit 2 on unknown options)
//! 2. Show usage for `--help` or no options, before anything else
//! 3. Load configuration
//! 4. Plan: validate options
//! 5. Connect to the audio server and execute the plan

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use mixctl_config::{BackendDriver, ConfigError, MixctlConfig};
use mixctl_core::{
    AudioBackend, ExitStatus, MockBackend, Outcome, PactlBackend, PactlConfig, Plan, PlanDefaults,
};
use std::process::ExitCode;
use tracing::{debug, warn};

fn main() -> ExitCode {
    let args = match cli::Args::try_parse() {
        Ok(args) => args,
        Err(err) => return parse_error(err),
    };

    setup_logging(&args);

    match run(&args, MixctlConfig::load_default) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("mixctl: {:#}", err);
            ExitStatus::FAILURE.into()
        }
    }
}

/// Report a command-line error with the usage text appended
fn parse_error(err: clap::Error) -> ExitCode {
    if err.kind() == ErrorKind::DisplayVersion {
        let _ = err.print();
        return ExitStatus::SUCCESS.into();
    }

    eprintln!("{}", err.render());
    eprintln!("{}", cli::usage());
    ExitStatus::USAGE_ERROR.into()
}

fn run<F>(args: &cli::Args, load_config: F) -> Result<ExitStatus>
where
    F: FnOnce() -> std::result::Result<MixctlConfig, ConfigError>,
{
    let options = args.to_options();
    if options.wants_usage() {
        println!("{}", cli::usage());
        return Ok(ExitStatus::SUCCESS);
    }

    let config = load_config().context("Failed to load configuration")?;

    let defaults = PlanDefaults {
        gamma: config.mixer.gamma,
    };

    let plan = match Plan::from_options_with(&options, &defaults)? {
        Outcome::ShowUsage => {
            println!("{}", cli::usage());
            return Ok(ExitStatus::SUCCESS);
        }
        Outcome::Execute(plan) => plan,
    };

    let backend = connect(&config)?;
    let mut stdout = std::io::stdout().lock();
    let status = plan.execute(backend.as_ref(), &mut stdout)?;
    debug!("Finished with exit status {}", status.code());

    Ok(status)
}

/// Open the configured backend
fn connect(config: &MixctlConfig) -> Result<Box<dyn AudioBackend>> {
    match config.backend.driver {
        BackendDriver::Pactl => {
            let backend = PactlBackend::connect_with(PactlConfig {
                program: config.backend.pactl_path.clone(),
                client_name: config.backend.client_name.clone(),
                server: config.backend.server.clone(),
            })?;
            Ok(Box::new(backend))
        }
        BackendDriver::Mock => {
            warn!("Using the mock backend, devices are simulated and nothing reaches the audio server");
            Ok(Box::new(MockBackend::demo()))
        }
    }
}

/// Setup logging to stderr, keeping stdout for query output
fn setup_logging(args: &cli::Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = if args.verbose > 0 {
        EnvFilter::new(args.log_level())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
