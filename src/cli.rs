//! CLI arguments and subcommands for plugflux.
//!
//! This module defines the command-line interface structure using the clap
//! library, including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "plugflux",
    about = "Telemetry agent polling smart-plug electricity readings into InfluxDB",
    long_about = "Telemetry agent polling smart-plug electricity readings into InfluxDB.\n\n\
                  Continuously polls the vendor cloud for instantaneous power, voltage and \
                  current readings of the configured smart plugs and writes one time-series \
                  point per device and cycle.",
    version,
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit (credentials masked)
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Polling interval in seconds
    #[arg(short = 'i', long)]
    pub interval: Option<u64>,

    /// Device names to monitor (comma-separated, or ALL)
    #[arg(short = 'd', long)]
    pub devices: Option<String>,

    /// Cloud account email
    #[arg(long)]
    pub cloud_email: Option<String>,

    /// Cloud account password
    #[arg(long)]
    pub cloud_password: Option<String>,

    /// Cloud API base URL
    #[arg(long)]
    pub cloud_api_url: Option<String>,

    /// InfluxDB base URL
    #[arg(long)]
    pub influx_url: Option<String>,

    /// InfluxDB API token
    #[arg(long)]
    pub influx_token: Option<String>,

    /// InfluxDB organization
    #[arg(long)]
    pub influx_org: Option<String>,

    /// InfluxDB bucket
    #[arg(long)]
    pub influx_bucket: Option<String>,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check connectivity to the cloud API and InfluxDB
    Check {
        /// Check the cloud device API only
        #[arg(long)]
        cloud: bool,

        /// Check InfluxDB only
        #[arg(long)]
        influx: bool,

        /// Check everything (default when no flag is given)
        #[arg(long)]
        all: bool,
    },

    /// Generate a configuration file
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },
}
