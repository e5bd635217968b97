//! Device registry collaborator.
//!
//! The core consumes this trait only; the shipped implementation talks to
//! the vendor cloud over HTTP (see [`cloud`]). The registry owns device
//! discovery and per-device state refresh; the polling loop never caches
//! its results between cycles.

pub mod cloud;

use async_trait::async_trait;

use crate::device::Device;
use crate::error::RegistryError;

pub use cloud::CloudRegistry;

/// Authenticated handle onto the device fleet.
#[async_trait]
pub trait DeviceRegistry: Send + Sync {
    /// Lists the currently known devices, capability flags populated.
    async fn list_devices(&self) -> Result<Vec<Device>, RegistryError>;

    /// Asks the device to publish fresh state. May fail per device when it
    /// is offline or unreachable; such failures must stay per-device.
    async fn refresh(&self, device: &Device) -> Result<(), RegistryError>;

    /// Fetches the instantaneous metric payload. The payload format is
    /// firmware-defined and treated as opaque text.
    async fn fetch_metrics(&self, device: &Device) -> Result<String, RegistryError>;

    /// Releases the session. Called exactly once while draining.
    async fn close(self: Box<Self>) -> Result<(), RegistryError>;
}
