//! Shared test doubles for the polling loop tests: an in-memory device
//! registry and a recording sink, both with failure injection and close
//! counters.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use plugflux::device::{Device, OnlineStatus};
use plugflux::error::{RegistryError, SinkError};
use plugflux::extract::MetricSample;
use plugflux::registry::DeviceRegistry;
use plugflux::sink::TelemetrySink;

pub const DEFAULT_PAYLOAD: &str = "POWER = 1.00 W, VOLTAGE = 230.00 V, CURRENT = 0.10 A";

pub fn dev(name: &str) -> Device {
    Device {
        name: name.to_string(),
        online: OnlineStatus::Online,
        electricity: true,
    }
}

/// In-memory registry with per-device failure injection.
pub struct MockRegistry {
    pub devices: Vec<Device>,
    pub fail_list: bool,
    pub fail_refresh: HashSet<String>,
    pub fail_fetch: HashSet<String>,
    pub payloads: HashMap<String, String>,
    pub closes: Arc<AtomicUsize>,
    pub fail_close: bool,
}

impl MockRegistry {
    pub fn new(devices: Vec<Device>) -> Self {
        Self {
            devices,
            fail_list: false,
            fail_refresh: HashSet::new(),
            fail_fetch: HashSet::new(),
            payloads: HashMap::new(),
            closes: Arc::new(AtomicUsize::new(0)),
            fail_close: false,
        }
    }
}

#[async_trait]
impl DeviceRegistry for MockRegistry {
    async fn list_devices(&self) -> Result<Vec<Device>, RegistryError> {
        if self.fail_list {
            return Err(RegistryError::Protocol("device list unavailable".into()));
        }
        Ok(self.devices.clone())
    }

    async fn refresh(&self, device: &Device) -> Result<(), RegistryError> {
        if self.fail_refresh.contains(&device.name) {
            return Err(RegistryError::DeviceUnreachable {
                device: device.name.clone(),
                reason: "injected refresh failure".into(),
            });
        }
        Ok(())
    }

    async fn fetch_metrics(&self, device: &Device) -> Result<String, RegistryError> {
        if self.fail_fetch.contains(&device.name) {
            return Err(RegistryError::DeviceUnreachable {
                device: device.name.clone(),
                reason: "injected fetch failure".into(),
            });
        }
        Ok(self
            .payloads
            .get(&device.name)
            .cloned()
            .unwrap_or_else(|| DEFAULT_PAYLOAD.to_string()))
    }

    async fn close(self: Box<Self>) -> Result<(), RegistryError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(RegistryError::Protocol("injected logout failure".into()));
        }
        Ok(())
    }
}

/// Sink that records every write in order.
pub struct RecordingSink {
    pub writes: Arc<Mutex<Vec<MetricSample>>>,
    pub fail_for: HashSet<String>,
    pub closes: Arc<AtomicUsize>,
    pub fail_close: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            writes: Arc::new(Mutex::new(Vec::new())),
            fail_for: HashSet::new(),
            closes: Arc::new(AtomicUsize::new(0)),
            fail_close: false,
        }
    }

    pub fn written_devices(&self) -> Vec<String> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.device_name.clone())
            .collect()
    }
}

#[async_trait]
impl TelemetrySink for RecordingSink {
    async fn write(&self, sample: &MetricSample) -> Result<(), SinkError> {
        if self.fail_for.contains(&sample.device_name) {
            return Err(SinkError::Rejected {
                status: 500,
                body: "injected write failure".into(),
            });
        }
        self.writes.lock().unwrap().push(sample.clone());
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), SinkError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(SinkError::Rejected {
                status: 500,
                body: "injected close failure".into(),
            });
        }
        Ok(())
    }
}
