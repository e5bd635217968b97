//! Error types for plugflux.
//!
//! Collaborator failures are split into registry (cloud API) and sink
//! (InfluxDB) errors so the cycle runner can attribute per-device outcomes
//! precisely.

use thiserror::Error;

/// Errors raised by the device registry collaborator.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Sign-in rejected by the cloud API. Fatal at startup.
    #[error("cloud sign-in rejected for {email}: {reason}")]
    Auth { email: String, reason: String },

    /// Transport-level failure talking to the cloud API.
    #[error("cloud request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The cloud API answered with something we cannot interpret.
    #[error("unexpected cloud response: {0}")]
    Protocol(String),

    /// A single device did not answer a refresh or metric request.
    #[error("device {device} unreachable: {reason}")]
    DeviceUnreachable { device: String, reason: String },
}

/// Errors raised by the time-series sink collaborator.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Transport-level failure talking to InfluxDB.
    #[error("sink request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// InfluxDB answered the write with a non-success status.
    #[error("sink rejected write (status {status}): {body}")]
    Rejected { status: u16, body: String },
}
