//! Check command implementation.
//!
//! Validates configuration and connectivity to both external
//! collaborators: the cloud device API (sign-in and logout) and InfluxDB
//! (health endpoint). Mirrors what the agent needs at startup, so a
//! passing check means the main loop can start.

use crate::config::{validate_effective_config, Config};
use crate::registry::{CloudRegistry, DeviceRegistry};
use crate::sink::InfluxSink;

/// Validates collaborator connectivity and configuration.
pub async fn command_check(
    cloud: bool,
    influx: bool,
    all: bool,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 plugflux - Connectivity Check");
    println!("================================");

    // No flag means everything.
    let all = all || (!cloud && !influx);
    let mut all_ok = true;

    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => {
            println!("   ✅ Configuration is valid");
        }
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            // Connectivity checks need the missing values; stop here.
            println!("\n📋 Summary:");
            println!("   ❌ Some checks failed - please review warnings");
            std::process::exit(1);
        }
    }

    if cloud || all {
        println!("\n☁️  Checking cloud device API...");
        match check_cloud(config).await {
            Ok(device_count) => {
                println!("   ✅ Sign-in and logout successful");
                println!("   ✅ Cloud reports {} devices", device_count);
            }
            Err(e) => {
                println!("   ❌ Cloud API check failed: {}", e);
                all_ok = false;
            }
        }
    }

    if influx || all {
        println!("\n📈 Checking InfluxDB...");
        match check_influx(config).await {
            Ok(_) => {
                println!("   ✅ InfluxDB is healthy");
            }
            Err(e) => {
                println!("   ❌ InfluxDB check failed: {}", e);
                all_ok = false;
            }
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed - agent is ready");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review warnings");
        std::process::exit(1);
    }
}

/// Signs in, lists devices, and logs out again.
async fn check_cloud(config: &Config) -> Result<usize, Box<dyn std::error::Error>> {
    let registry = CloudRegistry::connect(
        config.cloud_api_url.as_deref().unwrap_or_default(),
        config.cloud_email.as_deref().unwrap_or_default(),
        config.cloud_password.as_deref().unwrap_or_default(),
    )
    .await?;

    let devices = registry.list_devices().await?;
    Box::new(registry).close().await?;
    Ok(devices.len())
}

/// Probes the InfluxDB health endpoint.
async fn check_influx(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let sink = InfluxSink::new(
        config.influx_url.as_deref().unwrap_or_default(),
        config.influx_token.as_deref().unwrap_or_default(),
        config.influx_org.as_deref().unwrap_or_default(),
        config.influx_bucket.as_deref().unwrap_or_default(),
    )?;
    sink.health().await?;
    Ok(())
}
