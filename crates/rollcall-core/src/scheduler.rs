//! Single-flight refresh scheduling.
//!
//! A refresh cycle fetches the node list and the status flag, then writes
//! both into the [`StateStore`]. At most one cycle is ever in flight.
//!
//! # State Machine
//!
//! ```text
//!            begin() [Idle]                finish(ticket, ..)
//! ┌──────┐ ───────────────> ┌────────────┐ ─────────────────> ┌──────┐
//! │ Idle │                  │ Refreshing │                    │ Idle │
//! └──────┘                  └────────────┘                    └──────┘
//!                             │      ^
//!                             └──────┘ begin() [Refreshing]: dropped
//! ```
//!
//! Triggers that arrive while a cycle is in flight are dropped, not queued.
//! The next timer tick is the only recovery path.
//!
//! # Guaranteed release
//!
//! [`RefreshScheduler::begin`] hands out a [`RefreshTicket`]. The ticket is
//! not `Clone`, and [`RefreshScheduler::finish`] consumes it, so a cycle can
//! be finished at most once. The runtime is responsible for handing every
//! ticket back, with an error if the fetch failed or was torn down; the
//! scheduler returns to `Idle` on every path.

use std::{fmt, time::SystemTime};

use rollcall_proto::NodeList;

use crate::{error::SchedulerError, snapshot::StateStore};

/// What started a refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Periodic poll.
    Timer,
    /// Initial load or an explicit operator request.
    Manual,
    /// Follow-up to a completed command.
    Command,
}

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No cycle in flight.
    Idle,
    /// A cycle is in flight.
    Refreshing {
        /// Cycle number of the in-flight refresh.
        cycle: u64,
        /// What started it.
        trigger: Trigger,
    },
}

/// Permission to run one refresh cycle.
///
/// Must be handed back to [`RefreshScheduler::finish`] exactly once.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a refresh ticket must be handed back to RefreshScheduler::finish"]
pub struct RefreshTicket {
    cycle: u64,
    trigger: Trigger,
}

impl RefreshTicket {
    /// Cycle number.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// What started the cycle.
    pub fn trigger(&self) -> Trigger {
        self.trigger
    }
}

/// Results of both fetches of a successful cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshFetch {
    /// `GET /api/nodes` result.
    pub nodes: NodeList,
    /// `GET /api/status` result.
    pub status: bool,
}

/// Outcome of a finished cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshReport {
    /// Snapshot now reflects the fetch.
    Updated {
        /// Cycle number.
        cycle: u64,
    },
    /// Snapshot kept its previous nodes and status.
    Failed {
        /// Cycle number.
        cycle: u64,
        /// Failure description, also stored in the snapshot.
        error: String,
    },
}

/// Refresh scheduler
///
/// Pure state machine; the runtime performs the fetches.
#[derive(Debug)]
pub struct RefreshScheduler {
    state: SchedulerState,
    next_cycle: u64,
    dropped: u64,
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshScheduler {
    /// Scheduler in `Idle` state.
    pub fn new() -> Self {
        Self { state: SchedulerState::Idle, next_cycle: 1, dropped: 0 }
    }

    /// Current state.
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// A cycle is in flight.
    pub fn is_refreshing(&self) -> bool {
        matches!(self.state, SchedulerState::Refreshing { .. })
    }

    /// Number of triggers dropped because a cycle was already in flight.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Try to start a cycle.
    ///
    /// Returns `None` and drops the trigger if a cycle is already in flight.
    /// Otherwise marks the store as loading and returns the ticket for the
    /// new cycle.
    pub fn begin(&mut self, trigger: Trigger, store: &mut StateStore) -> Option<RefreshTicket> {
        if let SchedulerState::Refreshing { cycle, .. } = self.state {
            self.dropped += 1;
            tracing::debug!(in_flight = cycle, ?trigger, "refresh already in flight, dropping");
            return None;
        }

        let cycle = self.next_cycle;
        self.next_cycle += 1;
        self.state = SchedulerState::Refreshing { cycle, trigger };
        store.set_loading(true);

        tracing::debug!(cycle, ?trigger, "refresh started");
        Some(RefreshTicket { cycle, trigger })
    }

    /// Finish the cycle identified by `ticket`.
    ///
    /// On success the nodes, status and completion time are written to the
    /// store. On failure they are left untouched and the error is recorded.
    /// Either way the loading flag is cleared and the scheduler is `Idle`.
    ///
    /// # Errors
    ///
    /// Returns `StaleTicket` if `ticket` is not the cycle in flight. State is
    /// unchanged in that case.
    pub fn finish<E: fmt::Display>(
        &mut self,
        ticket: RefreshTicket,
        outcome: Result<RefreshFetch, E>,
        now: SystemTime,
        store: &mut StateStore,
    ) -> Result<RefreshReport, SchedulerError> {
        match self.state {
            SchedulerState::Refreshing { cycle, .. } if cycle == ticket.cycle => {},
            SchedulerState::Refreshing { cycle, .. } => {
                return Err(SchedulerError::StaleTicket {
                    ticket: ticket.cycle,
                    current: Some(cycle),
                });
            },
            SchedulerState::Idle => {
                return Err(SchedulerError::StaleTicket { ticket: ticket.cycle, current: None });
            },
        }

        let report = match outcome {
            Ok(fetch) => {
                store.set_nodes(fetch.nodes);
                store.set_status(fetch.status);
                store.mark_refreshed(now);
                RefreshReport::Updated { cycle: ticket.cycle }
            },
            Err(e) => {
                let error = e.to_string();
                tracing::warn!(cycle = ticket.cycle, %error, "refresh failed, keeping previous snapshot");
                store.record_error(error.clone());
                RefreshReport::Failed { cycle: ticket.cycle, error }
            },
        };

        store.set_loading(false);
        self.state = SchedulerState::Idle;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use proptest::prelude::*;
    use rollcall_proto::{Created, Node};

    use super::*;

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn fetch(names: &[&str], status: bool) -> RefreshFetch {
        let nodes = names
            .iter()
            .map(|name| Node {
                name: (*name).into(),
                mac: None,
                ip: "10.0.0.1".into(),
                created: Created::from_secs(0),
                you: false,
            })
            .collect();
        RefreshFetch { nodes, status }
    }

    #[test]
    fn second_trigger_dropped_while_refreshing() {
        let mut store = StateStore::new();
        let mut scheduler = RefreshScheduler::new();

        let ticket = scheduler.begin(Trigger::Manual, &mut store).unwrap();
        assert!(store.read().loading);
        assert!(scheduler.begin(Trigger::Timer, &mut store).is_none());
        assert!(scheduler.begin(Trigger::Command, &mut store).is_none());
        assert_eq!(scheduler.dropped(), 2);

        scheduler.finish(ticket, Ok::<_, String>(fetch(&["a"], true)), at(5), &mut store).unwrap();
        assert!(!store.read().loading);
        assert!(scheduler.begin(Trigger::Timer, &mut store).is_some());
    }

    #[test]
    fn success_overwrites_snapshot() {
        let mut store = StateStore::new();
        let mut scheduler = RefreshScheduler::new();

        let ticket = scheduler.begin(Trigger::Timer, &mut store).unwrap();
        let report = scheduler
            .finish(ticket, Ok::<_, String>(fetch(&["a", "b"], true)), at(7), &mut store)
            .unwrap();

        assert_eq!(report, RefreshReport::Updated { cycle: 1 });
        assert_eq!(store.read().nodes.len(), 2);
        assert!(store.read().status);
        assert_eq!(store.read().refreshed_at, Some(at(7)));
    }

    #[test]
    fn failure_keeps_previous_values_and_releases_guard() {
        let mut store = StateStore::new();
        let mut scheduler = RefreshScheduler::new();

        let ticket = scheduler.begin(Trigger::Timer, &mut store).unwrap();
        scheduler.finish(ticket, Ok::<_, String>(fetch(&["a"], true)), at(1), &mut store).unwrap();

        let ticket = scheduler.begin(Trigger::Timer, &mut store).unwrap();
        let report = scheduler
            .finish(ticket, Err::<RefreshFetch, _>("connection refused"), at(2), &mut store)
            .unwrap();

        assert!(matches!(report, RefreshReport::Failed { cycle: 2, .. }));
        let s = store.read();
        assert_eq!(s.nodes.len(), 1);
        assert!(s.status);
        assert_eq!(s.refreshed_at, Some(at(1)));
        assert_eq!(s.last_error.as_deref(), Some("connection refused"));
        assert!(!s.loading);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn success_clears_last_error() {
        let mut store = StateStore::new();
        let mut scheduler = RefreshScheduler::new();

        let ticket = scheduler.begin(Trigger::Timer, &mut store).unwrap();
        scheduler.finish(ticket, Err::<RefreshFetch, _>("boom"), at(1), &mut store).unwrap();
        let ticket = scheduler.begin(Trigger::Timer, &mut store).unwrap();
        scheduler.finish(ticket, Ok::<_, String>(fetch(&[], false)), at(2), &mut store).unwrap();

        assert_eq!(store.read().last_error, None);
    }

    #[test]
    fn ticket_from_another_scheduler_is_rejected() {
        let mut store = StateStore::new();
        let mut a = RefreshScheduler::new();
        let mut b = RefreshScheduler::new();

        let _in_flight = a.begin(Trigger::Timer, &mut store).unwrap();
        let foreign = b.begin(Trigger::Timer, &mut store).unwrap();
        let _next = b.finish(foreign, Ok::<_, String>(fetch(&[], false)), at(1), &mut store);

        let foreign = b.begin(Trigger::Timer, &mut store).unwrap();
        let err = a.finish(foreign, Ok::<_, String>(fetch(&[], false)), at(1), &mut store);
        assert_eq!(err, Err(SchedulerError::StaleTicket { ticket: 2, current: Some(1) }));
        assert!(a.is_refreshing());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Trigger(u8),
        Complete(bool),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![(0u8..3).prop_map(Op::Trigger), any::<bool>().prop_map(Op::Complete)]
    }

    proptest! {
        /// Any interleaving of triggers and completions keeps at most one
        /// cycle in flight, and the loading flag mirrors the state.
        #[test]
        fn at_most_one_cycle_in_flight(ops in prop::collection::vec(op(), 0..64)) {
            let mut store = StateStore::new();
            let mut scheduler = RefreshScheduler::new();
            let mut in_flight: Option<RefreshTicket> = None;
            let mut issued = 0u64;
            let mut dropped = 0u64;

            for (step, op) in ops.into_iter().enumerate() {
                match op {
                    Op::Trigger(t) => {
                        let trigger = [Trigger::Timer, Trigger::Manual, Trigger::Command][t as usize];
                        match scheduler.begin(trigger, &mut store) {
                            Some(ticket) => {
                                prop_assert!(in_flight.is_none());
                                issued += 1;
                                prop_assert_eq!(ticket.cycle(), issued);
                                in_flight = Some(ticket);
                            },
                            None => {
                                prop_assert!(in_flight.is_some());
                                dropped += 1;
                            },
                        }
                    },
                    Op::Complete(ok) => {
                        if let Some(ticket) = in_flight.take() {
                            let outcome = if ok {
                                Ok(fetch(&["n"], step % 2 == 0))
                            } else {
                                Err("timeout".to_string())
                            };
                            scheduler.finish(ticket, outcome, at(step as u64), &mut store).unwrap();
                        }
                    },
                }
                prop_assert_eq!(store.read().loading, in_flight.is_some());
                prop_assert_eq!(scheduler.is_refreshing(), in_flight.is_some());
            }
            prop_assert_eq!(scheduler.dropped(), dropped);
        }
    }
}
