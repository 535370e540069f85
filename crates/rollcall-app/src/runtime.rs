//! Generic orchestration loop.
//!
//! The runtime owns the [`App`] and is the only place it is mutated. Three
//! sources feed it events:
//!
//! ```text
//!  poll timer ──Tick──────────┐
//!  driver ──intents/quit──────┼──> App::handle ──actions──> driver / bridge / prefs
//!  bridge ──completions───────┘
//! ```
//!
//! Fetches and commands run on spawned tasks; the loop never awaits a
//! network call itself, so ticks that land while a refresh is in flight
//! reach the scheduler and are dropped there.

use std::sync::Arc;

use rollcall_client::RegistryApi;
use tokio::{
    sync::mpsc::{self, UnboundedReceiver},
    time::{Instant, MissedTickBehavior},
};

use crate::{App, AppAction, AppEvent, Bridge, ClientConfig, Driver, PreferenceStore};

/// Event loop driving an [`App`] with a [`Driver`] and a [`RegistryApi`].
pub struct Runtime<D: Driver, A: RegistryApi, P: PreferenceStore> {
    driver: D,
    app: App,
    bridge: Bridge<A>,
    prefs: P,
    config: ClientConfig,
    completions: UnboundedReceiver<AppEvent>,
}

impl<D: Driver, A: RegistryApi, P: PreferenceStore> Runtime<D, A, P> {
    /// Runtime with a fresh [`App`] seeded from `prefs`.
    pub fn new(driver: D, api: A, prefs: P, config: ClientConfig) -> Self {
        let (tx, completions) = mpsc::unbounded_channel();
        let bridge = Bridge::new(Arc::new(api), config.request_timeout, tx);
        let app = App::new(prefs.default_name());
        Self { driver, app, bridge, prefs, config, completions }
    }

    /// Current application state.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Run until the operator quits. Returns the final application state.
    ///
    /// Starts with an immediate refresh, then refreshes every
    /// `poll_interval`.
    ///
    /// # Errors
    ///
    /// Returns the driver's error if input or rendering fails.
    pub async fn run(mut self) -> Result<App, D::Error> {
        let period = self.config.poll_interval;
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(server = %self.config.base_url, ?period, "client started");
        self.driver.render(&self.app)?;

        let mut running = self.process(AppEvent::RefreshRequested)?;
        while running {
            let events = tokio::select! {
                _ = ticker.tick() => vec![AppEvent::Tick],
                Some(event) = self.completions.recv() => vec![event],
                polled = self.driver.poll_event() => polled?,
            };

            for event in events {
                if !self.process(event)? {
                    running = false;
                    break;
                }
            }
        }

        tracing::info!("client stopping");
        self.driver.stop();
        Ok(self.app)
    }

    /// Feed one event to the App and execute the resulting actions. Returns
    /// `false` once the App asks to quit.
    fn process(&mut self, event: AppEvent) -> Result<bool, D::Error> {
        let now = self.driver.now();
        for action in self.app.handle(event, now) {
            match action {
                AppAction::Render => self.driver.render(&self.app)?,
                AppAction::Quit => return Ok(false),
                AppAction::Fetch(ticket) => {
                    let _task = self.bridge.spawn_refresh(ticket);
                },
                AppAction::Execute(command) => {
                    let _task = self.bridge.spawn_command(command);
                },
                AppAction::PromptName { default } => self.driver.prompt_name(&default),
                AppAction::SaveDefaultName(name) => {
                    if let Err(e) = self.prefs.set_default_name(&name) {
                        tracing::warn!(error = %e, "could not persist default name");
                    }
                },
            }
        }
        Ok(true)
    }
}
