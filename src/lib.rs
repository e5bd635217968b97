//! plugflux - smart-plug electricity telemetry into InfluxDB.
//!
//! A continuously-running ingestion agent: it polls a fleet of
//! cloud-connected smart plugs on a fixed interval, extracts instantaneous
//! power/voltage/current readings from their firmware-defined telemetry
//! payloads, and writes one time-series point per device and cycle.
//!
//! The core loop lives in [`cycle`] and is driven by the [`supervisor`];
//! the external collaborators (cloud device registry, InfluxDB sink) are
//! traits in [`registry`] and [`sink`] with one shipped implementation
//! each.

pub mod cli;
pub mod commands;
pub mod config;
pub mod cycle;
pub mod device;
pub mod error;
pub mod extract;
pub mod registry;
pub mod sink;
pub mod supervisor;

// Re-export main types for convenience
pub use cycle::{CycleReport, DeviceOutcome, DeviceReport};
pub use device::{Device, MonitorSet, OnlineStatus};
pub use error::{RegistryError, SinkError};
pub use extract::MetricSample;
pub use registry::{CloudRegistry, DeviceRegistry};
pub use sink::{InfluxSink, TelemetrySink};
pub use supervisor::{Supervisor, SupervisorState};
