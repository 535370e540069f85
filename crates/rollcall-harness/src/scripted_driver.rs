//! Scripted driver.
//!
//! Replays operator events at fixed offsets from its creation and records
//! every frame the runtime renders. Time comes from tokio's clock, so under
//! `start_paused` the whole run is deterministic.

use std::{
    collections::VecDeque,
    convert::Infallible,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use rollcall_app::{App, AppEvent, Driver};
use rollcall_core::{Intent, View};
use tokio::time::Instant;

/// Wall-clock time the scripted clock starts at.
pub const EPOCH_OFFSET: Duration = Duration::from_secs(1_800_000_000);

/// One rendered frame.
#[derive(Debug, Clone)]
pub struct RenderedFrame {
    /// Offset from driver creation.
    pub at: Duration,
    /// What was rendered.
    pub view: View,
    /// Notice shown alongside.
    pub notice: Option<String>,
    /// A name prompt was open.
    pub prompting: bool,
}

/// Everything the driver observed.
#[derive(Debug, Default)]
pub struct DriverLog {
    /// Rendered frames in order.
    pub frames: Vec<RenderedFrame>,
    /// Defaults offered by each name prompt.
    pub prompts: Vec<String>,
    /// `stop` was called.
    pub stopped: bool,
}

/// Driver replaying a fixed script.
#[derive(Debug)]
pub struct ScriptedDriver {
    start: Instant,
    script: VecDeque<(Duration, AppEvent)>,
    ready: VecDeque<AppEvent>,
    prompt_answer: Option<String>,
    log: Arc<Mutex<DriverLog>>,
}

impl Default for ScriptedDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedDriver {
    /// Driver with an empty script. Without a scheduled quit it runs forever.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            script: VecDeque::new(),
            ready: VecDeque::new(),
            prompt_answer: None,
            log: Arc::new(Mutex::new(DriverLog::default())),
        }
    }

    /// Deliver `event` at `offset` after creation. Events must be added in
    /// order.
    pub fn at(mut self, offset: Duration, event: AppEvent) -> Self {
        self.script.push_back((offset, event));
        self
    }

    /// Deliver an operator intent at `offset`.
    pub fn intent_at(self, offset: Duration, intent: Intent) -> Self {
        self.at(offset, AppEvent::Intent(intent))
    }

    /// Quit at `offset`.
    pub fn quit_at(self, offset: Duration) -> Self {
        self.at(offset, AppEvent::Quit)
    }

    /// Answer every name prompt with `answer`. Without this, prompts are
    /// cancelled.
    pub fn answer_prompts(mut self, answer: impl Into<String>) -> Self {
        self.prompt_answer = Some(answer.into());
        self
    }

    /// Shared handle on what the driver observed.
    pub fn log(&self) -> Arc<Mutex<DriverLog>> {
        Arc::clone(&self.log)
    }

    fn record(&self) -> MutexGuard<'_, DriverLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Driver for ScriptedDriver {
    type Error = Infallible;

    async fn poll_event(&mut self) -> Result<Vec<AppEvent>, Self::Error> {
        if let Some(event) = self.ready.pop_front() {
            return Ok(vec![event]);
        }

        let Some(offset) = self.script.front().map(|(offset, _)| *offset) else {
            return std::future::pending().await;
        };
        tokio::time::sleep_until(self.start + offset).await;

        Ok(self.script.pop_front().map(|(_, event)| event).into_iter().collect())
    }

    fn prompt_name(&mut self, default: &str) {
        self.record().prompts.push(default.to_string());
        let intent = match &self.prompt_answer {
            Some(answer) => Intent::SubmitName(answer.clone()),
            None => Intent::CancelPrompt,
        };
        self.ready.push_back(AppEvent::Intent(intent));
    }

    fn now(&self) -> SystemTime {
        UNIX_EPOCH + EPOCH_OFFSET + self.start.elapsed()
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        let frame = RenderedFrame {
            at: self.start.elapsed(),
            view: app.view(),
            notice: app.notice().map(str::to_string),
            prompting: app.is_prompting(),
        };
        self.record().frames.push(frame);
        Ok(())
    }

    fn stop(&mut self) {
        self.record().stopped = true;
    }
}
