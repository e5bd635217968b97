//! HTTP client for the vendor cloud device API.
//!
//! Sign-in yields a session token that authorizes the device endpoints;
//! `close` logs the session out. Device capability is derived from the
//! ability list the cloud reports per device, so "does this device report
//! electricity" is a data check here, not a type hierarchy.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::device::{Device, OnlineStatus};
use crate::error::RegistryError;
use crate::registry::DeviceRegistry;

/// Ability string marking a device as electricity-capable.
const ELECTRICITY_ABILITY: &str = "Appliance.Control.Electricity";

/// HTTP timeout for cloud requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct SignInResponse {
    token: String,
}

/// One device entry as the cloud reports it.
#[derive(Deserialize)]
struct DeviceRecord {
    name: String,
    #[serde(rename = "onlineStatus")]
    online_status: i32,
    #[serde(default)]
    abilities: Vec<String>,
}

#[derive(Serialize)]
struct DeviceRequest<'a> {
    name: &'a str,
}

/// Authenticated session against the vendor cloud.
pub struct CloudRegistry {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl CloudRegistry {
    /// Signs in and returns an authenticated registry handle.
    ///
    /// Any failure here is startup-fatal for the agent: without a session
    /// there is nothing to poll.
    pub async fn connect(
        base_url: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let response = client
            .post(format!("{}/v1/Auth/signIn", base_url))
            .json(&SignInRequest { email, password })
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(RegistryError::Auth {
                email: email.to_string(),
                reason: format!("status {}", status),
            });
        }
        if !status.is_success() {
            return Err(RegistryError::Protocol(format!(
                "sign-in answered with status {}",
                status
            )));
        }

        let body: SignInResponse = response.json().await?;
        debug!("Cloud sign-in successful for {}", email);

        Ok(Self {
            client,
            base_url,
            token: body.token,
        })
    }

    fn device_url(&self, endpoint: &str) -> String {
        format!("{}/v1/Device/{}", self.base_url, endpoint)
    }
}

impl From<DeviceRecord> for Device {
    fn from(record: DeviceRecord) -> Self {
        let online = match record.online_status {
            1 => OnlineStatus::Online,
            2 => OnlineStatus::Offline,
            _ => OnlineStatus::Unknown,
        };
        let electricity = record.abilities.iter().any(|a| a == ELECTRICITY_ABILITY);
        Device {
            name: record.name,
            online,
            electricity,
        }
    }
}

#[async_trait]
impl DeviceRegistry for CloudRegistry {
    async fn list_devices(&self) -> Result<Vec<Device>, RegistryError> {
        let response = self
            .client
            .post(self.device_url("devList"))
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Protocol(format!(
                "device list answered with status {}",
                status
            )));
        }

        let records: Vec<DeviceRecord> = response.json().await?;
        debug!("Cloud reported {} devices", records.len());
        Ok(records.into_iter().map(Device::from).collect())
    }

    async fn refresh(&self, device: &Device) -> Result<(), RegistryError> {
        let response = self
            .client
            .post(self.device_url("refresh"))
            .bearer_auth(&self.token)
            .json(&DeviceRequest { name: &device.name })
            .send()
            .await
            .map_err(|e| RegistryError::DeviceUnreachable {
                device: device.name.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::DeviceUnreachable {
                device: device.name.clone(),
                reason: format!("refresh answered with status {}", status),
            });
        }
        Ok(())
    }

    async fn fetch_metrics(&self, device: &Device) -> Result<String, RegistryError> {
        let response = self
            .client
            .post(self.device_url("electricity"))
            .bearer_auth(&self.token)
            .json(&DeviceRequest { name: &device.name })
            .send()
            .await
            .map_err(|e| RegistryError::DeviceUnreachable {
                device: device.name.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::DeviceUnreachable {
                device: device.name.clone(),
                reason: format!("metric fetch answered with status {}", status),
            });
        }

        Ok(response.text().await?)
    }

    async fn close(self: Box<Self>) -> Result<(), RegistryError> {
        let response = self
            .client
            .post(format!("{}/v1/Auth/logout", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!("Cloud logout answered with status {}", response.status());
        }
        debug!("Cloud session closed");
        Ok(())
    }
}
