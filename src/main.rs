//! plugflux - smart-plug electricity telemetry into InfluxDB.
//!
//! Main entry point: resolves configuration, establishes the cloud session
//! and the sink connection, then hands both to the supervisor until an
//! operator shutdown.

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, Level};

use plugflux::cli::{Args, Commands, LogLevel};
use plugflux::commands::{command_check, command_config};
use plugflux::config::{resolve_config, show_config, validate_effective_config, Config};
use plugflux::registry::CloudRegistry;
use plugflux::sink::InfluxSink;
use plugflux::supervisor::{shutdown_signal, Supervisor};

/// Initializes tracing logging subsystem with configured log level.
fn setup_logging(args: &Args) {
    let log_level = match args.log_level {
        LogLevel::Off => Level::ERROR,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Establishes both collaborator sessions. Any failure here is fatal: the
/// process exits non-zero without running a single cycle.
async fn start_collaborators(config: &Config) -> anyhow::Result<(CloudRegistry, InfluxSink)> {
    let registry = CloudRegistry::connect(
        config.cloud_api_url.as_deref().unwrap_or_default(),
        config.cloud_email.as_deref().unwrap_or_default(),
        config.cloud_password.as_deref().unwrap_or_default(),
    )
    .await
    .context("failed to establish cloud session")?;

    let sink = InfluxSink::new(
        config.influx_url.as_deref().unwrap_or_default(),
        config.influx_token.as_deref().unwrap_or_default(),
        config.influx_org.as_deref().unwrap_or_default(),
        config.influx_bucket.as_deref().unwrap_or_default(),
    )
    .context("failed to set up InfluxDB sink")?;

    Ok((registry, sink))
}

/// Main application entry point.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format);
    }

    // Handle subcommands
    if let Some(command) = &args.command {
        let config = resolve_config(&args)?;

        return match command {
            Commands::Check { cloud, influx, all } => {
                command_check(*cloud, *influx, *all, &config).await
            }
            Commands::Config {
                output,
                format,
                commented,
            } => command_config(output.clone(), format.clone(), *commented),
        };
    }

    // Load configuration for agent mode
    let config = resolve_config(&args)?;

    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }

    setup_logging(&args);

    info!("Starting plugflux {}", env!("CARGO_PKG_VERSION"));

    // Validation above guarantees these are present.
    let monitor_set = config
        .monitor_set()
        .expect("monitor set validated at startup");
    let interval = Duration::from_secs(
        config
            .fetch_interval_secs
            .unwrap_or(plugflux::config::DEFAULT_FETCH_INTERVAL_SECS),
    );

    let (registry, sink) = match start_collaborators(&config).await {
        Ok(pair) => pair,
        Err(e) => {
            error!("Startup failed: {:#}", e);
            std::process::exit(1);
        }
    };

    let supervisor = Supervisor::new(Box::new(registry), Box::new(sink), monitor_set, interval);

    let clean = supervisor.run(shutdown_signal()).await;
    if !clean {
        std::process::exit(1);
    }

    info!("plugflux stopped gracefully");
    Ok(())
}
