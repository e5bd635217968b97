//! Integration tests for configuration file loading.

use std::io::Write;

use plugflux::config::{load_config, validate_effective_config, DEFAULT_FETCH_INTERVAL_SECS};
use plugflux::device::MonitorSet;
use tempfile::NamedTempFile;

fn temp_config(extension: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(&format!(".{}", extension))
        .tempfile()
        .expect("failed to create temp config");
    file.write_all(content.as_bytes())
        .expect("failed to write temp config");
    file
}

#[test]
fn test_load_yaml_config() {
    let file = temp_config(
        "yaml",
        r#"
cloud_email: "ops@example.com"
cloud_password: "secret"
cloud_api_url: "https://cloud.example.com"
influx_url: "http://localhost:8086"
influx_token: "token"
influx_org: "home"
influx_bucket: "energy"
fetch_interval_secs: 30
devices:
  - kitchen
  - office
"#,
    );

    let config = load_config(file.path().to_str()).unwrap();
    assert_eq!(config.cloud_email.as_deref(), Some("ops@example.com"));
    assert_eq!(config.fetch_interval_secs, Some(30));
    assert_eq!(
        config.monitor_set(),
        Some(MonitorSet::Names(vec![
            "kitchen".to_string(),
            "office".to_string()
        ]))
    );
    assert!(validate_effective_config(&config).is_ok());
}

#[test]
fn test_load_yaml_config_with_kebab_case_keys() {
    let file = temp_config(
        "yml",
        r#"
cloud-email: "ops@example.com"
fetch-interval-secs: 15
devices: ["ALL"]
"#,
    );

    let config = load_config(file.path().to_str()).unwrap();
    assert_eq!(config.cloud_email.as_deref(), Some("ops@example.com"));
    assert_eq!(config.fetch_interval_secs, Some(15));
    assert_eq!(config.monitor_set(), Some(MonitorSet::All));
}

#[test]
fn test_load_json_config() {
    let file = temp_config(
        "json",
        r#"{
  "cloud_email": "ops@example.com",
  "devices": ["kitchen"]
}"#,
    );

    let config = load_config(file.path().to_str()).unwrap();
    assert_eq!(config.cloud_email.as_deref(), Some("ops@example.com"));
    assert_eq!(
        config.monitor_set(),
        Some(MonitorSet::Names(vec!["kitchen".to_string()]))
    );
}

#[test]
fn test_load_toml_config() {
    let file = temp_config(
        "toml",
        r#"
cloud_email = "ops@example.com"
fetch_interval_secs = 120
devices = ["ALL"]
"#,
    );

    let config = load_config(file.path().to_str()).unwrap();
    assert_eq!(config.cloud_email.as_deref(), Some("ops@example.com"));
    assert_eq!(config.fetch_interval_secs, Some(120));
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let config = load_config(Some("/nonexistent/plugflux.yaml")).unwrap();
    assert_eq!(config.fetch_interval_secs, Some(DEFAULT_FETCH_INTERVAL_SECS));
    assert_eq!(config.monitor_set(), Some(MonitorSet::All));
}

#[test]
fn test_malformed_yaml_is_an_error() {
    let file = temp_config("yaml", "devices: [unbalanced");
    assert!(load_config(file.path().to_str()).is_err());
}
