//! One polling cycle over the selected device set.
//!
//! The cycle body is fully stateless: every invocation re-derives the
//! device set from the registry, polls each device strictly in order, and
//! collects one outcome value per device into a `CycleReport`. A single
//! unreachable device produces a report entry, never an early return; only
//! failure to obtain the device list at all aborts the cycle.

use tracing::{debug, info, warn};

use crate::device::{self, MonitorSet};
use crate::error::RegistryError;
use crate::extract;
use crate::registry::DeviceRegistry;
use crate::sink::TelemetrySink;

/// What happened to one device during a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceOutcome {
    /// Sample written (or nothing extractable, which is not a failure).
    Written,
    /// The state refresh failed; the device was skipped for this cycle.
    RefreshFailed(String),
    /// The metric fetch failed after a successful refresh.
    FetchFailed(String),
    /// The sink rejected the write.
    WriteFailed(String),
}

/// Per-device entry in a cycle report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceReport {
    pub device: String,
    pub outcome: DeviceOutcome,
}

/// Summary of one full pass over the selected device set.
#[derive(Debug, Clone, Default)]
pub struct CycleReport {
    pub outcomes: Vec<DeviceReport>,
}

impl CycleReport {
    /// No device matched the monitor set this cycle.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn written(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|r| r.outcome == DeviceOutcome::Written)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.written()
    }
}

/// Runs one polling cycle: select, then refresh → fetch → extract → write
/// per device, sequentially and in selector order.
///
/// Per-device failures are contained in the report. An `Err` here means
/// the cycle itself could not run (device list unavailable) and escalates
/// to the supervisor's drain path.
pub async fn run_once(
    registry: &dyn DeviceRegistry,
    sink: &dyn TelemetrySink,
    monitor_set: &MonitorSet,
) -> Result<CycleReport, RegistryError> {
    let all_devices = registry.list_devices().await?;
    let selected = device::select(&all_devices, monitor_set);

    if selected.is_empty() {
        info!(
            "No matching device to monitor (monitor set: {}, {} devices known)",
            monitor_set,
            all_devices.len()
        );
        return Ok(CycleReport::default());
    }

    debug!("Polling {} devices this cycle", selected.len());

    let mut outcomes = Vec::with_capacity(selected.len());
    for dev in &selected {
        let outcome = poll_device(registry, sink, dev).await;
        outcomes.push(DeviceReport {
            device: dev.name.clone(),
            outcome,
        });
    }

    Ok(CycleReport { outcomes })
}

/// Polls a single device. Every failure path returns an outcome value so
/// the caller keeps iterating.
async fn poll_device(
    registry: &dyn DeviceRegistry,
    sink: &dyn TelemetrySink,
    dev: &device::Device,
) -> DeviceOutcome {
    if let Err(e) = registry.refresh(dev).await {
        warn!("State refresh failed for {} ({}): {}", dev.name, dev.online, e);
        return DeviceOutcome::RefreshFailed(e.to_string());
    }

    let payload = match registry.fetch_metrics(dev).await {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Metric fetch failed for {}: {}", dev.name, e);
            return DeviceOutcome::FetchFailed(e.to_string());
        }
    };

    let sample = extract::extract(&dev.name, &payload);
    if sample.is_empty() {
        debug!(
            "No metric fields found in payload for {} ({} bytes)",
            dev.name,
            payload.len()
        );
    }

    match sink.write(&sample).await {
        Ok(()) => {
            debug!(
                "Wrote sample for {}: power={:?} W, voltage={:?} V, current={:?} A",
                dev.name, sample.power_watts, sample.voltage_volts, sample.current_amps
            );
            DeviceOutcome::Written
        }
        Err(e) => {
            warn!("Sink write failed for {}: {}", dev.name, e);
            DeviceOutcome::WriteFailed(e.to_string())
        }
    }
}
