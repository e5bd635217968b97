//! InfluxDB v2 line protocol generation.
//!
//! One `MetricSample` becomes one line: fixed measurement, one tag for the
//! device name, and only the fields that were actually extracted. Absent
//! fields are omitted from the line entirely rather than written as zero.

use crate::extract::MetricSample;

/// Fixed measurement name for all electricity points.
pub const MEASUREMENT: &str = "electricity";

/// Tag key carrying the device identity.
pub const DEVICE_TAG: &str = "device_name";

/// Escapes a measurement name: `,` and space must be backslash-escaped.
fn escape_measurement(s: &str) -> String {
    s.replace(',', "\\,").replace(' ', "\\ ")
}

/// Escapes a tag key or tag value: `,`, `=` and space must be
/// backslash-escaped.
fn escape_tag(s: &str) -> String {
    s.replace(',', "\\,").replace('=', "\\=").replace(' ', "\\ ")
}

/// Renders a sample as one line-protocol point with nanosecond timestamp.
///
/// Returns `None` when every field is absent: line protocol requires at
/// least one field, and an all-absent sample carries no information worth
/// a point.
pub fn sample_line(sample: &MetricSample) -> Option<String> {
    let mut fields = Vec::with_capacity(3);
    if let Some(power) = sample.power_watts {
        fields.push(format!("power={}", power));
    }
    if let Some(voltage) = sample.voltage_volts {
        fields.push(format!("voltage={}", voltage));
    }
    if let Some(current) = sample.current_amps {
        fields.push(format!("current={}", current));
    }
    if fields.is_empty() {
        return None;
    }

    let timestamp_ns = sample.timestamp.timestamp_nanos_opt().unwrap_or_default();

    Some(format!(
        "{},{}={} {} {}",
        escape_measurement(MEASUREMENT),
        escape_tag(DEVICE_TAG),
        escape_tag(&sample.device_name),
        fields.join(","),
        timestamp_ns
    ))
}
