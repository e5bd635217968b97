//! Metric extraction from raw device telemetry.
//!
//! Device firmware renders instantaneous readings as free-form text along
//! the lines of `POWER = 12.50 W, VOLTAGE = 230.10 V, CURRENT = 0.05 A`.
//! The exact shape drifts across firmware versions, so each field is
//! located independently and a missing field is simply absent from the
//! sample. Extraction never fails: a payload we cannot read at all yields
//! a sample with every field absent.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static POWER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"POWER = (\d+\.\d+) W").expect("power pattern is valid"));
static VOLTAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"VOLTAGE = (\d+\.\d+) V").expect("voltage pattern is valid"));
static CURRENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"CURRENT = (\d+\.\d+) A").expect("current pattern is valid"));

/// One timestamped extraction of a device's electrical readings.
///
/// Each numeric field is either a finite non-negative value or `None`;
/// absence of one field never blocks the others. Samples are produced
/// fresh each cycle, written immediately, and discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub device_name: String,
    /// Capture time, not a device-reported time.
    pub timestamp: DateTime<Utc>,
    pub power_watts: Option<f64>,
    pub voltage_volts: Option<f64>,
    pub current_amps: Option<f64>,
}

impl MetricSample {
    /// True when no field was extractable from the payload.
    pub fn is_empty(&self) -> bool {
        self.power_watts.is_none() && self.voltage_volts.is_none() && self.current_amps.is_none()
    }
}

/// Finds and parses one metric value. The pattern only admits unsigned
/// decimals, so a successful parse is non-negative; the finite check
/// guards against values too large for f64.
fn capture_value(re: &Regex, payload: &str) -> Option<f64> {
    let raw = re.captures(payload)?.get(1)?.as_str();
    let value: f64 = raw.parse().ok()?;
    value.is_finite().then_some(value)
}

/// Extracts a `MetricSample` from a raw telemetry payload.
///
/// The three fields are matched independently; malformed or unexpected
/// payloads degrade to all-fields-absent rather than an error.
pub fn extract(device_name: &str, payload: &str) -> MetricSample {
    MetricSample {
        device_name: device_name.to_string(),
        timestamp: Utc::now(),
        power_watts: capture_value(&POWER_RE, payload),
        voltage_volts: capture_value(&VOLTAGE_RE, payload),
        current_amps: capture_value(&CURRENT_RE, payload),
    }
}
