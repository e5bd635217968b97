//! Config command implementation.
//!
//! Generates configuration files in various formats.

use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::Config;

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let output = match output {
        Some(path) => path,
        None => PathBuf::from("plugflux.yaml"),
    };

    let content = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(&config)?,
        ConfigFormat::Toml => toml::to_string_pretty(&config)?,
        ConfigFormat::Yaml => {
            let mut content = serde_yaml::to_string(&config)?;
            if commented {
                content = add_config_comments(content);
            }
            content
        }
    };

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# plugflux Configuration
# ======================
#
# Cloud Device API
# ----------------
# cloud_email: "me@example.com"       # Cloud account email
# cloud_password: "secret"            # Cloud account password
# cloud_api_url: "https://iot.example.com"  # Cloud API base URL
#
# InfluxDB Sink
# -------------
# influx_url: "http://localhost:8086" # InfluxDB base URL
# influx_token: "..."                 # API token with write access
# influx_org: "home"                  # Organization
# influx_bucket: "energy"             # Bucket receiving the points
#
# Polling
# -------
# fetch_interval_secs: 60             # Seconds between polling cycles
# devices: ["ALL"]                    # Device names, or the ALL sentinel
#
# Every key can also be set via environment (PLUGFLUX_EMAIL,
# PLUGFLUX_PASSWORD, PLUGFLUX_API_URL, PLUGFLUX_INFLUX_URL,
# PLUGFLUX_INFLUX_TOKEN, PLUGFLUX_INFLUX_ORG, PLUGFLUX_INFLUX_BUCKET,
# PLUGFLUX_FETCH_INTERVAL, PLUGFLUX_DEVICES) or on the command line.

"#;

    format!("{}{}", comments, yaml)
}
