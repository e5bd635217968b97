//! Configuration management for plugflux.
//!
//! Handles loading, merging, and validating configuration from files,
//! environment variables, and CLI arguments. Supports YAML, JSON, and TOML
//! file formats. Precedence: CLI > environment > config file > defaults —
//! resolved exactly once at startup.

use crate::cli::{Args, ConfigFormat};
use crate::device::MonitorSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

// Default configuration constants
pub const DEFAULT_FETCH_INTERVAL_SECS: u64 = 60;

/// Prefix for all environment variable overrides.
const ENV_PREFIX: &str = "PLUGFLUX_";

/// Agent configuration. Every key can come from a config file, an
/// environment variable (`PLUGFLUX_*`), or a CLI flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Cloud device API
    #[serde(alias = "cloud-email")]
    pub cloud_email: Option<String>,
    #[serde(alias = "cloud-password")]
    pub cloud_password: Option<String>,
    #[serde(alias = "cloud-api-url")]
    pub cloud_api_url: Option<String>,

    // InfluxDB sink
    #[serde(alias = "influx-url")]
    pub influx_url: Option<String>,
    #[serde(alias = "influx-token")]
    pub influx_token: Option<String>,
    #[serde(alias = "influx-org")]
    pub influx_org: Option<String>,
    #[serde(alias = "influx-bucket")]
    pub influx_bucket: Option<String>,

    // Polling
    #[serde(alias = "fetch-interval-secs")]
    pub fetch_interval_secs: Option<u64>,
    /// Device names to monitor; the single entry `ALL` selects every
    /// electricity-capable device.
    pub devices: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cloud_email: None,
            cloud_password: None,
            cloud_api_url: None,
            influx_url: None,
            influx_token: None,
            influx_org: None,
            influx_bucket: None,
            fetch_interval_secs: Some(DEFAULT_FETCH_INTERVAL_SECS),
            devices: Some(vec![crate::device::ALL_SENTINEL.to_string()]),
        }
    }
}

impl Config {
    /// Parses the configured device list into a monitor set. `None` when
    /// the list is missing or contains no usable entry.
    pub fn monitor_set(&self) -> Option<MonitorSet> {
        MonitorSet::parse(self.devices.as_deref().unwrap_or(&[]))
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let interval = cfg
        .fetch_interval_secs
        .unwrap_or(DEFAULT_FETCH_INTERVAL_SECS);
    if interval == 0 {
        return Err("fetch_interval_secs must be a positive number of seconds".into());
    }

    for (key, value) in [
        ("cloud_email", &cfg.cloud_email),
        ("cloud_password", &cfg.cloud_password),
        ("cloud_api_url", &cfg.cloud_api_url),
        ("influx_url", &cfg.influx_url),
        ("influx_token", &cfg.influx_token),
        ("influx_org", &cfg.influx_org),
        ("influx_bucket", &cfg.influx_bucket),
    ] {
        if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
            return Err(format!("{} is required but not set", key).into());
        }
    }

    if cfg.monitor_set().is_none() {
        return Err("devices must name at least one device, or the ALL sentinel".into());
    }

    Ok(())
}

/// Resolves configuration from CLI args, environment, config file, and
/// defaults. Enforces precedence: CLI (if provided) > environment >
/// config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref().and_then(|p| p.to_str()))?
    };

    apply_env_overrides(&mut config, &|key| std::env::var(key).ok());

    // Override with CLI args
    if let Some(email) = &args.cloud_email {
        config.cloud_email = Some(email.clone());
    }
    if let Some(password) = &args.cloud_password {
        config.cloud_password = Some(password.clone());
    }
    if let Some(url) = &args.cloud_api_url {
        config.cloud_api_url = Some(url.clone());
    }
    if let Some(url) = &args.influx_url {
        config.influx_url = Some(url.clone());
    }
    if let Some(token) = &args.influx_token {
        config.influx_token = Some(token.clone());
    }
    if let Some(org) = &args.influx_org {
        config.influx_org = Some(org.clone());
    }
    if let Some(bucket) = &args.influx_bucket {
        config.influx_bucket = Some(bucket.clone());
    }
    if let Some(interval) = args.interval {
        config.fetch_interval_secs = Some(interval);
    }
    if let Some(devices_str) = &args.devices {
        config.devices = Some(split_device_list(devices_str));
    }

    Ok(config)
}

/// Applies `PLUGFLUX_*` environment variables on top of file/default
/// values. The lookup is injected so tests do not have to mutate the
/// process environment.
fn apply_env_overrides(config: &mut Config, get: &dyn Fn(&str) -> Option<String>) {
    let var = |suffix: &str| get(&format!("{}{}", ENV_PREFIX, suffix));

    if let Some(email) = var("EMAIL") {
        config.cloud_email = Some(email);
    }
    if let Some(password) = var("PASSWORD") {
        config.cloud_password = Some(password);
    }
    if let Some(url) = var("API_URL") {
        config.cloud_api_url = Some(url);
    }
    if let Some(url) = var("INFLUX_URL") {
        config.influx_url = Some(url);
    }
    if let Some(token) = var("INFLUX_TOKEN") {
        config.influx_token = Some(token);
    }
    if let Some(org) = var("INFLUX_ORG") {
        config.influx_org = Some(org);
    }
    if let Some(bucket) = var("INFLUX_BUCKET") {
        config.influx_bucket = Some(bucket);
    }
    if let Some(interval) = var("FETCH_INTERVAL") {
        if let Ok(secs) = interval.trim().parse::<u64>() {
            config.fetch_interval_secs = Some(secs);
        }
    }
    if let Some(devices) = var("DEVICES") {
        config.devices = Some(split_device_list(&devices));
    }
}

/// Splits a comma-separated device list as given on the CLI or in the
/// environment.
fn split_device_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim().to_string()).collect()
}

/// Configuration loading with multiple format support
pub fn load_config(path: Option<&str>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = if let Some(p) = path {
        PathBuf::from(p)
    } else {
        // Try default locations
        let defaults = [
            "/etc/plugflux/plugflux.yaml",
            "/etc/plugflux/plugflux.yml",
            "/etc/plugflux/plugflux.json",
            "./plugflux.yaml",
            "./plugflux.yml",
            "./plugflux.json",
        ];

        defaults
            .iter()
            .find(|p| Path::new(p).exists())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(""))
    };

    if !path.exists() || path.to_string_lossy().is_empty() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let config: Config = serde_json::from_str(&content)?;
            info!("Loaded JSON configuration from: {}", path.display());
            Ok(config)
        }
        Some("toml") => {
            let config: Config = toml::from_str(&content)?;
            info!("Loaded TOML configuration from: {}", path.display());
            Ok(config)
        }
        _ => {
            // Default to YAML
            let config: Config = serde_yaml::from_str(&content)?;
            info!("Loaded YAML configuration from: {}", path.display());
            Ok(config)
        }
    }
}

/// Shows configuration in requested format, with credentials masked.
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    let mut masked = config.clone();
    if masked.cloud_password.is_some() {
        masked.cloud_password = Some("********".to_string());
    }
    if masked.influx_token.is_some() {
        masked.influx_token = Some("********".to_string());
    }

    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(&masked)?,
        ConfigFormat::Toml => toml::to_string_pretty(&masked)?,
        ConfigFormat::Yaml => serde_yaml::to_string(&masked)?,
    };

    println!("{output}");
    Ok(())
}
