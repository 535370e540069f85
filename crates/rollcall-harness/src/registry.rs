//! In-memory registry server.
//!
//! Mirrors the server's semantics:
//!
//! - callers are identified by IP; `you` is set on the caller's entry
//! - registering again from the same IP renames the existing entry
//! - unregistering removes every entry with the caller's IP
//! - reorders with an out-of-range index are ignored (and still succeed)
//!
//! Each [`RegistryClient`] is one caller with its own latency and fault
//! settings. All clients of a [`MemoryRegistry`] share its state.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use rollcall_client::{ApiError, RegistryApi};
use rollcall_proto::{Created, NODES_PATH, Node, NodeList, STATUS_PATH};

const FIRST_CREATED_SECS: u64 = 1_700_000_000;

/// A mutation as seen by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    /// `POST /api/nodes`.
    Register {
        /// Caller IP.
        ip: String,
        /// Requested name.
        name: String,
    },
    /// `DELETE /api/nodes`.
    Unregister {
        /// Caller IP.
        ip: String,
    },
    /// `PUT /api/nodes`.
    Reorder {
        /// Caller IP.
        ip: String,
        /// Requested current index.
        cur_i: usize,
        /// Requested new index.
        new_i: usize,
    },
    /// `POST /api/status`.
    SetStatus {
        /// Requested value.
        on: bool,
    },
}

#[derive(Debug)]
struct StoredNode {
    name: String,
    ip: String,
    mac: Option<String>,
    created: Created,
}

#[derive(Debug, Default)]
struct State {
    nodes: Vec<StoredNode>,
    on: bool,
    registrations: u64,
    calls: Vec<RecordedCall>,
    list_calls: u64,
    status_calls: u64,
    lists_in_flight: usize,
    max_lists_in_flight: usize,
}

/// Shared in-memory registry.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    state: Arc<Mutex<State>>,
}

impl MemoryRegistry {
    /// Empty registry with status off.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a node directly, bypassing the API.
    pub fn seed(&self, name: &str, ip: &str) -> &Self {
        let mut state = self.lock();
        let created = next_created(&mut state);
        state.nodes.push(StoredNode { name: name.into(), ip: ip.into(), mac: None, created });
        self
    }

    /// Set the hardware address of the node at `ip`, as the router would
    /// after seeing its traffic.
    pub fn learn_mac(&self, ip: &str, mac: &str) {
        for node in self.lock().nodes.iter_mut().filter(|n| n.ip == ip) {
            node.mac = Some(mac.into());
        }
    }

    /// Set the global status directly.
    pub fn set_on(&self, on: bool) {
        self.lock().on = on;
    }

    /// A caller at `ip`.
    pub fn client(&self, ip: &str) -> RegistryClient {
        RegistryClient {
            registry: self.clone(),
            ip: ip.into(),
            latency: Duration::ZERO,
            faults: Arc::new(Mutex::new(Faults::default())),
        }
    }

    /// Node names in registry order.
    pub fn names(&self) -> Vec<String> {
        self.lock().nodes.iter().map(|n| n.name.clone()).collect()
    }

    /// Global status.
    pub fn is_on(&self) -> bool {
        self.lock().on
    }

    /// Every mutation received, in arrival order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Number of `GET /api/nodes` calls started.
    pub fn list_calls(&self) -> u64 {
        self.lock().list_calls
    }

    /// Number of `GET /api/status` calls started.
    pub fn status_calls(&self) -> u64 {
        self.lock().status_calls
    }

    /// Highest number of `GET /api/nodes` calls ever in flight at once.
    pub fn max_lists_in_flight(&self) -> usize {
        self.lock().max_lists_in_flight
    }

    fn view_for(&self, ip: &str) -> NodeList {
        self.lock()
            .nodes
            .iter()
            .map(|n| Node {
                name: n.name.clone(),
                mac: n.mac.clone(),
                ip: n.ip.clone(),
                created: n.created,
                you: n.ip == ip,
            })
            .collect()
    }

    fn upsert(&self, ip: &str, name: &str) {
        let mut state = self.lock();
        state.calls.push(RecordedCall::Register { ip: ip.into(), name: name.into() });
        if let Some(node) = state.nodes.iter_mut().find(|n| n.ip == ip) {
            node.name = name.into();
            return;
        }
        let created = next_created(&mut state);
        state.nodes.push(StoredNode { name: name.into(), ip: ip.into(), mac: None, created });
        tracing::debug!(ip, name, "node added");
    }

    fn remove(&self, ip: &str) {
        let mut state = self.lock();
        state.calls.push(RecordedCall::Unregister { ip: ip.into() });
        state.nodes.retain(|n| n.ip != ip);
    }

    fn reorder(&self, ip: &str, cur_i: usize, new_i: usize) {
        let mut state = self.lock();
        state.calls.push(RecordedCall::Reorder { ip: ip.into(), cur_i, new_i });
        let len = state.nodes.len();
        if cur_i >= len || new_i >= len {
            tracing::debug!(cur_i, new_i, len, "reorder out of range, ignored");
            return;
        }
        let node = state.nodes.remove(cur_i);
        state.nodes.insert(new_i, node);
    }

    fn store_status(&self, on: bool) {
        let mut state = self.lock();
        state.calls.push(RecordedCall::SetStatus { on });
        state.on = on;
    }
}

fn next_created(state: &mut State) -> Created {
    let created = Created::from_secs(FIRST_CREATED_SECS + state.registrations);
    state.registrations += 1;
    created
}

#[derive(Debug, Default)]
struct Faults {
    lists: VecDeque<ApiError>,
    status: VecDeque<ApiError>,
    commands: VecDeque<ApiError>,
}

/// Tracks one in-flight node list call; decrements on drop so calls
/// abandoned by a timeout are accounted for.
struct ListInFlight {
    registry: MemoryRegistry,
}

impl ListInFlight {
    fn enter(registry: &MemoryRegistry) -> Self {
        let mut state = registry.lock();
        state.list_calls += 1;
        state.lists_in_flight += 1;
        state.max_lists_in_flight = state.max_lists_in_flight.max(state.lists_in_flight);
        Self { registry: registry.clone() }
    }
}

impl Drop for ListInFlight {
    fn drop(&mut self) {
        self.registry.lock().lists_in_flight -= 1;
    }
}

/// One caller of a [`MemoryRegistry`].
#[derive(Debug, Clone)]
pub struct RegistryClient {
    registry: MemoryRegistry,
    ip: String,
    latency: Duration,
    faults: Arc<Mutex<Faults>>,
}

impl RegistryClient {
    /// Delay every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Caller IP.
    pub fn ip(&self) -> &str {
        &self.ip
    }

    fn faults(&self) -> MutexGuard<'_, Faults> {
        self.faults.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fail the next `GET /api/nodes` with `error`. Queued faults are used in
    /// order.
    pub fn fail_next_list(&self, error: ApiError) {
        self.faults().lists.push_back(error);
    }

    /// Fail the next `GET /api/status` with `error`.
    pub fn fail_next_status(&self, error: ApiError) {
        self.faults().status.push_back(error);
    }

    /// Fail the next mutation with `error`. The server never sees it.
    pub fn fail_next_command(&self, error: ApiError) {
        self.faults().commands.push_back(error);
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    async fn command(&self, path: &'static str) -> Result<(), ApiError> {
        self.delay().await;
        match self.faults().commands.pop_front() {
            Some(error) => {
                tracing::debug!(path, %error, "injected command fault");
                Err(error)
            },
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RegistryApi for RegistryClient {
    async fn list_nodes(&self) -> Result<NodeList, ApiError> {
        let _in_flight = ListInFlight::enter(&self.registry);
        self.delay().await;
        if let Some(error) = self.faults().lists.pop_front() {
            return Err(error);
        }
        Ok(self.registry.view_for(&self.ip))
    }

    async fn register_node(&self, name: &str) -> Result<(), ApiError> {
        self.command(NODES_PATH).await?;
        self.registry.upsert(&self.ip, name);
        Ok(())
    }

    async fn unregister_node(&self) -> Result<(), ApiError> {
        self.command(NODES_PATH).await?;
        self.registry.remove(&self.ip);
        Ok(())
    }

    async fn reorder_node(&self, cur_i: usize, new_i: usize) -> Result<(), ApiError> {
        self.command(NODES_PATH).await?;
        self.registry.reorder(&self.ip, cur_i, new_i);
        Ok(())
    }

    async fn get_status(&self) -> Result<bool, ApiError> {
        self.registry.lock().status_calls += 1;
        self.delay().await;
        if let Some(error) = self.faults().status.pop_front() {
            tracing::debug!(path = STATUS_PATH, %error, "injected status fault");
            return Err(error);
        }
        Ok(self.registry.is_on())
    }

    async fn set_status(&self, on: bool) -> Result<(), ApiError> {
        self.command(STATUS_PATH).await?;
        self.registry.store_status(on);
        Ok(())
    }
}
