//! Input line and key handling.
//!
//! The input line has two modes. In command mode it collects a `/command`
//! and the arrow keys move the table selection. In prompt mode it collects
//! the registration name, pre-filled with the remembered default.
//!
//! | Key             | Command mode                  | Prompt mode        |
//! |-----------------|-------------------------------|--------------------|
//! | `Enter`         | run the typed command         | submit the name    |
//! | `Esc`           | clear the line                | cancel the prompt  |
//! | `Up` / `Down`   | move the selection            |                    |
//! | `Shift+Up/Down` | move the selected node        |                    |
//! | `F5`            | refresh now                   |                    |
//! | `Ctrl+C`        | quit                          | quit               |

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rollcall_app::AppEvent;
use rollcall_core::{Direction, Intent};

use crate::commands;

/// What the input line is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// A `/command`.
    Command,
    /// A registration name.
    Prompt,
}

/// Outcome of one key press.
#[derive(Debug)]
pub enum KeyInput {
    /// Nothing changed.
    Ignored,
    /// Only local state changed; redraw.
    Edited,
    /// Events for the runtime.
    Events(Vec<AppEvent>),
}

/// Input line, selection and mode.
#[derive(Debug)]
pub struct InputState {
    mode: InputMode,
    buffer: String,
    selected: usize,
    error: Option<String>,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    /// Empty command line, first row selected.
    pub fn new() -> Self {
        Self { mode: InputMode::Command, buffer: String::new(), selected: 0, error: None }
    }

    /// Current mode.
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Text typed so far.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Selected row index.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Last command parse error.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Switch to prompt mode with `default` pre-filled.
    pub fn start_prompt(&mut self, default: &str) {
        self.mode = InputMode::Prompt;
        self.buffer = default.to_string();
        self.error = None;
    }

    /// Keep the selection inside a table of `rows` rows.
    pub fn clamp(&mut self, rows: usize) {
        self.selected = self.selected.min(rows.saturating_sub(1));
    }

    /// Handle one key press against a table of `rows` rows.
    pub fn handle_key(&mut self, key: KeyEvent, rows: usize) -> KeyInput {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyInput::Events(vec![AppEvent::Quit]);
        }

        match self.mode {
            InputMode::Command => self.command_key(key, rows),
            InputMode::Prompt => self.prompt_key(key),
        }
    }

    fn command_key(&mut self, key: KeyEvent, rows: usize) -> KeyInput {
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Up if shift => self.step(Direction::Up, rows),
            KeyCode::Down if shift => self.step(Direction::Down, rows),
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                KeyInput::Edited
            },
            KeyCode::Down => {
                self.selected = (self.selected + 1).min(rows.saturating_sub(1));
                KeyInput::Edited
            },
            KeyCode::F(5) => KeyInput::Events(vec![AppEvent::RefreshRequested]),
            KeyCode::Enter => {
                let command = commands::parse(&std::mem::take(&mut self.buffer));
                self.error = command.error();
                match command.into_event() {
                    Some(event) => KeyInput::Events(vec![event]),
                    None => KeyInput::Edited,
                }
            },
            KeyCode::Esc => {
                self.buffer.clear();
                self.error = None;
                KeyInput::Edited
            },
            code => self.edit(code),
        }
    }

    fn prompt_key(&mut self, key: KeyEvent) -> KeyInput {
        match key.code {
            KeyCode::Enter => {
                self.mode = InputMode::Command;
                let name = std::mem::take(&mut self.buffer);
                KeyInput::Events(vec![AppEvent::Intent(Intent::SubmitName(name))])
            },
            KeyCode::Esc => {
                self.mode = InputMode::Command;
                self.buffer.clear();
                KeyInput::Events(vec![AppEvent::Intent(Intent::CancelPrompt)])
            },
            code => self.edit(code),
        }
    }

    fn step(&self, direction: Direction, rows: usize) -> KeyInput {
        if rows == 0 {
            return KeyInput::Ignored;
        }
        KeyInput::Events(vec![AppEvent::Intent(Intent::Step { index: self.selected, direction })])
    }

    fn edit(&mut self, code: KeyCode) -> KeyInput {
        match code {
            KeyCode::Char(c) => self.buffer.push(c),
            KeyCode::Backspace => {
                self.buffer.pop();
            },
            _ => return KeyInput::Ignored,
        }
        KeyInput::Edited
    }
}
