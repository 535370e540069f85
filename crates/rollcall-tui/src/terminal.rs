//! Terminal driver.
//!
//! Implements [`Driver`] on top of crossterm's async event stream and a
//! ratatui terminal. The last rendered view is kept so that local edits to
//! the input line can be redrawn without going through the runtime.

use std::{
    io::{self, Stdout},
    time::SystemTime,
};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use rollcall_app::{App, AppEvent, Driver};
use rollcall_core::View;
use thiserror::Error;

use crate::{
    input::{InputState, KeyInput},
    ui::{self, Screen},
};

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// Terminal I/O failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// [`Driver`] for an interactive terminal.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    events: EventStream,
    input: InputState,
    server: String,
    view: Option<View>,
    notice: Option<String>,
    restored: bool,
}

impl TerminalDriver {
    /// Take over the terminal: raw mode, alternate screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be switched.
    pub fn new(server: impl Into<String>) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.clear()?;

        Ok(Self {
            terminal,
            events: EventStream::new(),
            input: InputState::new(),
            server: server.into(),
            view: None,
            notice: None,
            restored: false,
        })
    }

    fn rows(&self) -> usize {
        self.view.as_ref().map_or(0, |v| v.rows.len())
    }

    fn redraw(&mut self) -> Result<(), TerminalError> {
        let Some(view) = &self.view else {
            return Ok(());
        };
        let screen = Screen {
            server: &self.server,
            view,
            notice: self.notice.as_deref(),
            input: &self.input,
        };
        self.terminal.draw(|frame| ui::draw(frame, &screen))?;
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode()?;
        self.terminal.backend_mut().execute(LeaveAlternateScreen)?;
        self.terminal.show_cursor()
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event(&mut self) -> Result<Vec<AppEvent>, Self::Error> {
        let Some(event) = self.events.next().await else {
            tracing::info!("terminal input closed");
            return Ok(vec![AppEvent::Quit]);
        };

        match event? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let rows = self.rows();
                match self.input.handle_key(key, rows) {
                    KeyInput::Events(events) => Ok(events),
                    KeyInput::Edited => {
                        self.redraw()?;
                        Ok(Vec::new())
                    },
                    KeyInput::Ignored => Ok(Vec::new()),
                }
            },
            Event::Resize(..) => {
                self.redraw()?;
                Ok(Vec::new())
            },
            _ => Ok(Vec::new()),
        }
    }

    fn prompt_name(&mut self, default: &str) {
        self.input.start_prompt(default);
        if let Err(e) = self.redraw() {
            tracing::warn!(error = %e, "could not draw name prompt");
        }
    }

    fn now(&self) -> SystemTime {
        SystemTime::now()
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        let view = app.view();
        self.input.clamp(view.rows.len());
        self.view = Some(view);
        self.notice = app.notice().map(str::to_string);
        self.redraw()
    }

    fn stop(&mut self) {
        if let Err(e) = self.restore() {
            tracing::warn!(error = %e, "could not restore terminal");
        }
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
