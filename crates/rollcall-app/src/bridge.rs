//! Bridge between App actions and the registry API.
//!
//! Every fetch and command runs on its own task and reports back over the
//! runtime's event channel. Each task holds a [`Completion`] guard: if the
//! task finishes normally the real result is reported; if it is torn down
//! first (aborted, panicked, runtime shutting down) the guard reports
//! [`ApiError::Interrupted`] when dropped. Either way exactly one completion
//! event is sent, so the refresh guard in the scheduler is always released.

use std::{future::Future, sync::Arc, time::Duration};

use rollcall_client::{ApiError, RegistryApi};
use rollcall_core::{ApiCommand, RefreshFetch, RefreshTicket};
use rollcall_proto::{NODES_PATH, STATUS_PATH};
use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};

use crate::AppEvent;

type Report<T> = Box<dyn FnOnce(Result<T, ApiError>) -> AppEvent + Send>;

/// Reports exactly one completion event, on success, failure or drop.
struct Completion<T> {
    events: UnboundedSender<AppEvent>,
    report: Option<Report<T>>,
}

impl<T> Completion<T> {
    fn new(events: UnboundedSender<AppEvent>, report: Report<T>) -> Self {
        Self { events, report: Some(report) }
    }

    fn complete(mut self, result: Result<T, ApiError>) {
        self.send(result);
    }

    fn send(&mut self, result: Result<T, ApiError>) {
        if let Some(report) = self.report.take()
            && self.events.send(report(result)).is_err()
        {
            tracing::debug!("runtime gone, completion discarded");
        }
    }
}

impl<T> Drop for Completion<T> {
    fn drop(&mut self) {
        self.send(Err(ApiError::Interrupted));
    }
}

/// Runs App actions against a [`RegistryApi`].
pub struct Bridge<A: RegistryApi> {
    api: Arc<A>,
    timeout: Duration,
    events: UnboundedSender<AppEvent>,
}

impl<A: RegistryApi> Bridge<A> {
    /// Bridge reporting completions on `events`, bounding each call by
    /// `timeout`.
    pub fn new(api: Arc<A>, timeout: Duration, events: UnboundedSender<AppEvent>) -> Self {
        Self { api, timeout, events }
    }

    /// Fetch nodes and status for one refresh cycle.
    pub fn spawn_refresh(&self, ticket: RefreshTicket) -> JoinHandle<()> {
        let api = Arc::clone(&self.api);
        let timeout = self.timeout;
        let completion = Completion::new(
            self.events.clone(),
            Box::new(move |result: Result<RefreshFetch, ApiError>| AppEvent::RefreshCompleted {
                ticket,
                result,
            }),
        );

        tokio::spawn(async move {
            let result = fetch(api.as_ref(), timeout).await;
            completion.complete(result);
        })
    }

    /// Run one remote command.
    pub fn spawn_command(&self, command: ApiCommand) -> JoinHandle<()> {
        let api = Arc::clone(&self.api);
        let timeout = self.timeout;
        let reported = command.clone();
        let completion = Completion::new(
            self.events.clone(),
            Box::new(move |result: Result<(), ApiError>| AppEvent::CommandCompleted {
                command: reported,
                result,
            }),
        );

        tokio::spawn(async move {
            let result = execute(api.as_ref(), &command, timeout).await;
            completion.complete(result);
        })
    }
}

/// Fetch nodes and status concurrently.
///
/// Both calls run to completion (or timeout) before this returns; the
/// first failure, nodes before status, is reported.
async fn fetch<A: RegistryApi + ?Sized>(
    api: &A,
    timeout: Duration,
) -> Result<RefreshFetch, ApiError> {
    let (nodes, status) = tokio::join!(
        bounded(NODES_PATH, timeout, api.list_nodes()),
        bounded(STATUS_PATH, timeout, api.get_status()),
    );
    Ok(RefreshFetch { nodes: nodes?, status: status? })
}

/// Run one command.
async fn execute<A: RegistryApi + ?Sized>(
    api: &A,
    command: &ApiCommand,
    timeout: Duration,
) -> Result<(), ApiError> {
    match command {
        ApiCommand::Register { name } => {
            bounded(NODES_PATH, timeout, api.register_node(name)).await
        },
        ApiCommand::Unregister => bounded(NODES_PATH, timeout, api.unregister_node()).await,
        ApiCommand::Reorder { cur_i, new_i } => {
            bounded(NODES_PATH, timeout, api.reorder_node(*cur_i, *new_i)).await
        },
        ApiCommand::SetStatus { on } => bounded(STATUS_PATH, timeout, api.set_status(*on)).await,
    }
}

async fn bounded<T>(
    path: &'static str,
    timeout: Duration,
    call: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, ApiError> {
    tokio::time::timeout(timeout, call)
        .await
        .unwrap_or(Err(ApiError::Timeout { path, after: timeout }))
}
