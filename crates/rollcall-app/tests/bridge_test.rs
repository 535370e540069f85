//! Bridge completion guarantees.

use std::{sync::Arc, time::Duration};

use rollcall_app::{AppEvent, Bridge};
use rollcall_client::ApiError;
use rollcall_core::{ApiCommand, RefreshScheduler, StateStore, Trigger};
use rollcall_harness::MemoryRegistry;
use tokio::sync::mpsc;

#[tokio::test(start_paused = true)]
async fn refresh_reports_both_results() {
    let registry = MemoryRegistry::new();
    registry.seed("a", "10.0.0.1");
    registry.set_on(true);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let bridge = Bridge::new(Arc::new(registry.client("10.0.0.1")), Duration::from_secs(5), tx);

    let mut store = StateStore::new();
    let mut scheduler = RefreshScheduler::new();
    let ticket = scheduler.begin(Trigger::Manual, &mut store).unwrap();
    bridge.spawn_refresh(ticket).await.unwrap();

    let Some(AppEvent::RefreshCompleted { result: Ok(fetch), .. }) = rx.recv().await else {
        panic!("expected a successful refresh");
    };
    assert_eq!(fetch.nodes.len(), 1);
    assert!(fetch.nodes[0].you);
    assert!(fetch.status);
}

#[tokio::test(start_paused = true)]
async fn aborted_refresh_releases_the_guard() {
    let registry = MemoryRegistry::new();
    let slow = registry.client("10.0.0.1").with_latency(Duration::from_secs(30));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let bridge = Bridge::new(Arc::new(slow), Duration::from_secs(60), tx);

    let mut store = StateStore::new();
    let mut scheduler = RefreshScheduler::new();
    let ticket = scheduler.begin(Trigger::Timer, &mut store).unwrap();
    assert!(scheduler.is_refreshing());

    let task = bridge.spawn_refresh(ticket);
    tokio::time::sleep(Duration::from_secs(1)).await;
    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());

    let Some(AppEvent::RefreshCompleted { ticket, result }) = rx.recv().await else {
        panic!("expected a refresh completion");
    };
    assert!(matches!(result, Err(ApiError::Interrupted)));

    scheduler.finish(ticket, result, std::time::UNIX_EPOCH, &mut store).unwrap();
    assert!(!scheduler.is_refreshing());
    assert!(!store.read().loading);
    assert!(rx.try_recv().is_err(), "exactly one completion per task");
}

#[tokio::test(start_paused = true)]
async fn refresh_times_out() {
    let registry = MemoryRegistry::new();
    let slow = registry.client("10.0.0.1").with_latency(Duration::from_secs(10));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let bridge = Bridge::new(Arc::new(slow), Duration::from_secs(2), tx);

    let mut store = StateStore::new();
    let mut scheduler = RefreshScheduler::new();
    let ticket = scheduler.begin(Trigger::Timer, &mut store).unwrap();
    bridge.spawn_refresh(ticket).await.unwrap();

    let Some(AppEvent::RefreshCompleted { result: Err(error), .. }) = rx.recv().await else {
        panic!("expected a failed refresh");
    };
    assert!(matches!(error, ApiError::Timeout { path: "/api/nodes", .. }));
}

#[tokio::test(start_paused = true)]
async fn status_failure_fails_the_cycle() {
    let registry = MemoryRegistry::new();
    let client = registry.client("10.0.0.1");
    client.fail_next_status(ApiError::Status { path: "/api/status", status: 503 });
    let (tx, mut rx) = mpsc::unbounded_channel();
    let bridge = Bridge::new(Arc::new(client), Duration::from_secs(5), tx);

    let mut store = StateStore::new();
    let mut scheduler = RefreshScheduler::new();
    let ticket = scheduler.begin(Trigger::Manual, &mut store).unwrap();
    bridge.spawn_refresh(ticket).await.unwrap();

    let Some(AppEvent::RefreshCompleted { result, .. }) = rx.recv().await else {
        panic!("expected a refresh completion");
    };
    assert!(matches!(result, Err(ApiError::Status { status: 503, .. })));
    // The node list was still fetched to completion.
    assert_eq!(registry.list_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn command_runs_against_the_server() {
    let registry = MemoryRegistry::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let bridge = Bridge::new(Arc::new(registry.client("10.0.0.4")), Duration::from_secs(5), tx);

    let command = ApiCommand::Register { name: "Ana".into() };
    bridge.spawn_command(command.clone()).await.unwrap();

    let Some(AppEvent::CommandCompleted { command: done, result: Ok(()) }) = rx.recv().await else {
        panic!("expected a successful command");
    };
    assert_eq!(done, command);
    assert_eq!(registry.names(), vec!["Ana"]);
}
