//! Supervisor: lifecycle owner of the polling loop.
//!
//! Owns both collaborator handles for the process lifetime and drives the
//! cycle loop on a fixed interval. States: Starting → Running → Draining →
//! Stopped. Session establishment (the Starting work) happens in the
//! binary's startup path before the supervisor is constructed; a failure
//! there never reaches `run`.

use std::time::Duration;

use tracing::{debug, error, info};

use crate::cycle::{self, CycleReport};
use crate::device::MonitorSet;
use crate::registry::DeviceRegistry;
use crate::sink::TelemetrySink;

/// Lifecycle states of the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Starting,
    Running,
    Draining,
    Stopped,
}

/// Drives the cycle loop and owns collaborator shutdown.
///
/// The registry session and the sink connection are owned exclusively
/// here; no other component closes or reopens them.
pub struct Supervisor {
    registry: Option<Box<dyn DeviceRegistry>>,
    sink: Option<Box<dyn TelemetrySink>>,
    monitor_set: MonitorSet,
    interval: Duration,
    state: SupervisorState,
}

impl Supervisor {
    pub fn new(
        registry: Box<dyn DeviceRegistry>,
        sink: Box<dyn TelemetrySink>,
        monitor_set: MonitorSet,
        interval: Duration,
    ) -> Self {
        Self {
            registry: Some(registry),
            sink: Some(sink),
            monitor_set,
            interval,
            state: SupervisorState::Starting,
        }
    }

    fn transition(&mut self, next: SupervisorState) {
        debug!("Supervisor state: {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Runs cycles until `shutdown` resolves or a cycle-level error
    /// occurs, then drains. Returns `true` iff shutdown was clean: no
    /// cycle-fatal error and both collaborators released without error.
    ///
    /// The shutdown future is observed at the inter-cycle wait; a cycle
    /// already in progress runs to completion first, so an in-flight write
    /// is never torn.
    pub async fn run(mut self, shutdown: impl std::future::Future<Output = ()>) -> bool {
        tokio::pin!(shutdown);

        self.transition(SupervisorState::Running);
        info!(
            "Polling every {}s (monitor set: {})",
            self.interval.as_secs(),
            self.monitor_set
        );

        let mut cycle_failed = false;
        loop {
            // Both handles are present until draining starts below.
            let (Some(registry), Some(sink)) = (self.registry.as_deref(), self.sink.as_deref())
            else {
                break;
            };

            match cycle::run_once(registry, sink, &self.monitor_set).await {
                Ok(report) => log_report(&report),
                Err(e) => {
                    error!("Polling cycle failed: {}", e);
                    cycle_failed = true;
                    break;
                }
            }

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, draining...");
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        self.transition(SupervisorState::Draining);
        let drain_clean = self.drain().await;

        self.transition(SupervisorState::Stopped);
        let clean = !cycle_failed && drain_clean;
        info!(
            "Supervisor stopped ({})",
            if clean { "clean" } else { "unclean" }
        );
        clean
    }

    /// Releases both collaborators. Each release is attempted
    /// independently so one failure cannot leak the other resource.
    async fn drain(&mut self) -> bool {
        let mut clean = true;

        if let Some(registry) = self.registry.take() {
            if let Err(e) = registry.close().await {
                error!("Failed to close device registry session: {}", e);
                clean = false;
            }
        }

        if let Some(sink) = self.sink.take() {
            if let Err(e) = sink.close().await {
                error!("Failed to close sink connection: {}", e);
                clean = false;
            }
        }

        clean
    }
}

fn log_report(report: &CycleReport) {
    if report.is_empty() {
        // Already logged by the cycle runner with the monitor set.
        return;
    }
    if report.failed() > 0 {
        info!(
            "Cycle complete: {} written, {} failed",
            report.written(),
            report.failed()
        );
    } else {
        info!("Cycle complete: {} written", report.written());
    }
}

/// Resolves when the operator asks the process to stop (SIGINT or, on
/// Unix, SIGTERM).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), shutting down gracefully...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }
}
