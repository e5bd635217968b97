//! Integration tests for the supervisor lifecycle.
//!
//! These tests verify that an operator interrupt observed at the
//! inter-cycle wait drains both collaborators exactly once, that one
//! failing release does not prevent the other, and that cycle-fatal
//! errors take the drain path instead of a silent death.

mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use common::{dev, MockRegistry, RecordingSink};
use plugflux::device::MonitorSet;
use plugflux::supervisor::Supervisor;

/// A long interval so the tests always interrupt during the wait, never
/// by racing a second cycle.
const INTERVAL: Duration = Duration::from_secs(3600);

#[tokio::test]
async fn test_interrupt_during_wait_closes_both_collaborators_once() {
    let registry = MockRegistry::new(vec![dev("one")]);
    let sink = RecordingSink::new();
    let registry_closes = registry.closes.clone();
    let sink_closes = sink.closes.clone();
    let writes = sink.writes.clone();

    let supervisor = Supervisor::new(
        Box::new(registry),
        Box::new(sink),
        MonitorSet::All,
        INTERVAL,
    );

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(supervisor.run(async move {
        let _ = rx.await;
    }));

    tx.send(()).expect("supervisor dropped shutdown receiver");
    let clean = handle.await.expect("supervisor task panicked");

    assert!(clean);
    assert_eq!(registry_closes.load(Ordering::SeqCst), 1);
    assert_eq!(sink_closes.load(Ordering::SeqCst), 1);
    // The first cycle ran to completion before the wait.
    assert_eq!(writes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_failing_close_does_not_prevent_other_close() {
    let mut registry = MockRegistry::new(vec![dev("one")]);
    registry.fail_close = true;
    let sink = RecordingSink::new();
    let registry_closes = registry.closes.clone();
    let sink_closes = sink.closes.clone();

    let supervisor = Supervisor::new(
        Box::new(registry),
        Box::new(sink),
        MonitorSet::All,
        INTERVAL,
    );

    let clean = supervisor.run(async {}).await;

    assert!(!clean, "a failed release must surface as unclean shutdown");
    assert_eq!(registry_closes.load(Ordering::SeqCst), 1);
    assert_eq!(sink_closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_cycle_fatal_error_drains_instead_of_dying() {
    let mut registry = MockRegistry::new(vec![dev("one")]);
    registry.fail_list = true;
    let sink = RecordingSink::new();
    let registry_closes = registry.closes.clone();
    let sink_closes = sink.closes.clone();

    let supervisor = Supervisor::new(
        Box::new(registry),
        Box::new(sink),
        MonitorSet::All,
        INTERVAL,
    );

    // No shutdown signal: the cycle failure itself must end the loop.
    let clean = supervisor.run(std::future::pending::<()>()).await;

    assert!(!clean);
    assert_eq!(registry_closes.load(Ordering::SeqCst), 1);
    assert_eq!(sink_closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_already_requested_shutdown_runs_one_final_cycle() {
    let registry = MockRegistry::new(vec![dev("one"), dev("two")]);
    let sink = RecordingSink::new();
    let writes = sink.writes.clone();

    let supervisor = Supervisor::new(
        Box::new(registry),
        Box::new(sink),
        MonitorSet::All,
        INTERVAL,
    );

    let clean = supervisor.run(async {}).await;

    assert!(clean);
    // The in-progress cycle finished: both devices written, none twice.
    let written: Vec<String> = writes
        .lock()
        .unwrap()
        .iter()
        .map(|s| s.device_name.clone())
        .collect();
    assert_eq!(written, vec!["one", "two"]);
}
