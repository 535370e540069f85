//! Application state machine.
//!
//! Owns the [`StateStore`], the [`RefreshScheduler`] and the
//! [`Dispatcher`]. Events go in, actions come out; nothing here performs
//! I/O or reads a clock.

use std::time::SystemTime;

use rollcall_core::{
    DispatchAction, DispatchError, Dispatcher, RefreshReport, RefreshScheduler, Snapshot,
    StateStore, Trigger, View, project,
};

use crate::{AppAction, AppEvent};

/// Application state.
#[derive(Debug)]
pub struct App {
    store: StateStore,
    scheduler: RefreshScheduler,
    dispatcher: Dispatcher,
    default_name: Option<String>,
    notice: Option<String>,
}

impl App {
    /// Fresh state with the remembered default registration name.
    pub fn new(default_name: Option<String>) -> Self {
        Self {
            store: StateStore::new(),
            scheduler: RefreshScheduler::new(),
            dispatcher: Dispatcher::new(),
            default_name,
            notice: None,
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> &Snapshot {
        self.store.read()
    }

    /// State store.
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Refresh scheduler.
    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    /// View model for rendering.
    pub fn view(&self) -> View {
        project(self.store.read())
    }

    /// Remembered default registration name.
    pub fn default_name(&self) -> Option<&str> {
        self.default_name.as_deref()
    }

    /// A name prompt is open.
    pub fn is_prompting(&self) -> bool {
        self.dispatcher.is_prompting()
    }

    /// Outcome of the last operator action, if worth showing.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Process one event.
    pub fn handle(&mut self, event: AppEvent, now: SystemTime) -> Vec<AppAction> {
        match event {
            AppEvent::Tick => self.refresh(Trigger::Timer),
            AppEvent::RefreshRequested => self.refresh(Trigger::Manual),
            AppEvent::Intent(intent) => {
                let result =
                    self.dispatcher.dispatch(intent, &self.store, self.default_name.as_deref());
                let mut actions = match result {
                    Ok(dispatched) => {
                        self.notice = None;
                        dispatched.into_iter().map(|a| self.dispatched(a)).collect()
                    },
                    Err(DispatchError::UserCancelled) => {
                        tracing::debug!("registration cancelled");
                        self.notice = None;
                        Vec::new()
                    },
                    Err(e) => {
                        self.notice = Some(e.to_string());
                        Vec::new()
                    },
                };
                actions.push(AppAction::Render);
                actions
            },
            AppEvent::RefreshCompleted { ticket, result } => {
                match self.scheduler.finish(ticket, result, now, &mut self.store) {
                    Ok(RefreshReport::Updated { cycle }) => {
                        tracing::trace!(cycle, nodes = self.store.read().nodes.len(), "refreshed");
                    },
                    Ok(RefreshReport::Failed { .. }) => {},
                    Err(e) => {
                        tracing::error!(error = %e, "refresh completion rejected");
                        return Vec::new();
                    },
                }
                vec![AppAction::Render]
            },
            AppEvent::CommandCompleted { command, result } => {
                match result {
                    Ok(()) => tracing::debug!(%command, "command completed"),
                    Err(e) => {
                        tracing::warn!(%command, error = %e, "command failed");
                        self.notice = Some(format!("could not {command}: {e}"));
                    },
                }
                let mut actions = self.refresh(Trigger::Command);
                actions.push(AppAction::Render);
                actions
            },
            AppEvent::Quit => vec![AppAction::Quit],
        }
    }

    fn refresh(&mut self, trigger: Trigger) -> Vec<AppAction> {
        match self.scheduler.begin(trigger, &mut self.store) {
            Some(ticket) => vec![AppAction::Fetch(ticket), AppAction::Render],
            None => Vec::new(),
        }
    }

    fn dispatched(&mut self, action: DispatchAction) -> AppAction {
        match action {
            DispatchAction::PromptName { default } => AppAction::PromptName { default },
            DispatchAction::SaveDefaultName(name) => {
                self.default_name = Some(name.clone());
                AppAction::SaveDefaultName(name)
            },
            DispatchAction::Execute(command) => {
                tracing::info!(%command, "dispatching command");
                AppAction::Execute(command)
            },
        }
    }
}
