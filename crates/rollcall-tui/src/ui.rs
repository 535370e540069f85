//! Frame rendering.
//!
//! Pure function of the [`View`], the latest notice and the input line, so
//! it can be exercised against ratatui's `TestBackend`.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};
use rollcall_core::{View, projection::EMPTY_MESSAGE};

use crate::input::{InputMode, InputState};

/// Everything drawn in one frame.
#[derive(Debug, Clone, Copy)]
pub struct Screen<'a> {
    /// Server base URL, shown in the header.
    pub server: &'a str,
    /// Projected client state.
    pub view: &'a View,
    /// Outcome of the last operator action.
    pub notice: Option<&'a str>,
    /// Input line state.
    pub input: &'a InputState,
}

/// Render a full frame.
pub fn draw(frame: &mut Frame<'_>, screen: &Screen<'_>) {
    let [header, body, footer] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(3), Constraint::Length(3)])
            .areas(frame.area());

    draw_header(frame, header, screen);
    draw_nodes(frame, body, screen);
    draw_footer(frame, footer, screen);
}

fn draw_header(frame: &mut Frame<'_>, area: Rect, screen: &Screen<'_>) {
    let view = screen.view;
    let status_style = if view.status_on { Style::new().green() } else { Style::new().red() };

    let mut spans = vec![
        Span::styled("rollcall", Style::new().bold()),
        Span::raw(" • "),
        Span::raw(screen.server),
        Span::raw(" • "),
        Span::styled(view.status_label(), status_style),
        Span::raw(" • "),
        Span::raw(view.registration_label()),
    ];
    if view.loading {
        spans.push(Span::styled(" • refreshing…", Style::new().yellow()));
    }

    let refreshed = match (&view.last_error, &view.refreshed_at) {
        (Some(error), _) => Line::styled(format!("refresh failed: {error}"), Style::new().red()),
        (None, Some(at)) => Line::raw(format!("updated {at}")).dark_gray(),
        (None, None) => Line::raw("waiting for first refresh").dark_gray(),
    };

    let header = Paragraph::new(vec![Line::from(spans), refreshed])
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn draw_nodes(frame: &mut Frame<'_>, area: Rect, screen: &Screen<'_>) {
    let view = screen.view;
    if view.is_empty() {
        let empty = Paragraph::new(Line::raw(EMPTY_MESSAGE).dark_gray()).centered();
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(["#", "Name", "MAC", "IP", "Created", ""])
        .style(Style::new().add_modifier(Modifier::BOLD));
    let rows = view.rows.iter().map(|row| {
        let moves = match (row.can_move_up, row.can_move_down) {
            (true, true) => "↑↓",
            (true, false) => "↑",
            (false, true) => "↓",
            (false, false) => "",
        };
        let name = if row.you { format!("{} (you)", row.name) } else { row.name.clone() };
        let style = if row.you { Style::new().cyan() } else { Style::new() };
        Row::new([
            Cell::from(row.position.to_string()),
            Cell::from(name),
            Cell::from(row.mac.as_str()),
            Cell::from(row.ip.as_str()),
            Cell::from(row.created.as_str()),
            Cell::from(moves),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(3),
        Constraint::Length(26),
        Constraint::Length(17),
        Constraint::Length(15),
        Constraint::Length(24),
        Constraint::Length(2),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(Style::new().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default().with_selected(Some(screen.input.selected()));
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_footer(frame: &mut Frame<'_>, area: Rect, screen: &Screen<'_>) {
    let input = screen.input;
    let message = match (input.error(), screen.notice) {
        (Some(error), _) => Line::styled(error.to_string(), Style::new().red()),
        (None, Some(notice)) => Line::styled(notice.to_string(), Style::new().yellow()),
        (None, None) => {
            Line::raw("/register /status /up N /down N /move A B /refresh /quit").dark_gray()
        },
    };

    let prompt = match input.mode() {
        InputMode::Command => Span::raw("> "),
        InputMode::Prompt => Span::styled("Name: ", Style::new().fg(Color::Cyan).bold()),
    };
    let line = Line::from(vec![prompt, Span::raw(input.buffer())]);

    let footer =
        Paragraph::new(vec![message, line]).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};
    use rollcall_core::RowView;

    use super::*;

    fn row(index: usize, name: &str, you: bool, len: usize) -> RowView {
        RowView {
            index,
            position: index + 1,
            name: name.into(),
            mac: "N/A".into(),
            ip: format!("10.0.0.{}", index + 1),
            created: "2023-11-14T22:13:20.000Z".into(),
            you,
            can_move_up: index > 0,
            can_move_down: index + 1 < len,
        }
    }

    fn view(rows: Vec<RowView>) -> View {
        View {
            registered: rows.iter().any(|r| r.you),
            rows,
            status_on: false,
            loading: false,
            refreshed_at: Some("2023-11-14T22:13:21.000Z".into()),
            last_error: None,
        }
    }

    fn text(buffer: &Buffer) -> String {
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|line| line.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render(view: &View, notice: Option<&str>, input: &InputState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 14)).unwrap();
        let screen = Screen { server: "http://127.0.0.1:8080", view, notice, input };
        terminal.draw(|frame| draw(frame, &screen)).unwrap();
        text(terminal.backend().buffer())
    }

    #[test]
    fn empty_registry_shows_message() {
        let out = render(&view(vec![]), None, &InputState::new());
        assert!(out.contains(EMPTY_MESSAGE));
        assert!(out.contains("Status: OFF"));
        assert!(out.contains("Register"));
        assert!(out.contains("updated 2023-11-14T22:13:21.000Z"));
    }

    #[test]
    fn rows_show_position_and_owner() {
        let view = view(vec![row(0, "Bo", false, 2), row(1, "Ana", true, 2)]);
        let out = render(&view, None, &InputState::new());

        assert!(out.contains("Unregister"));
        assert!(out.contains("Ana (you)"));
        assert!(out.contains("10.0.0.2"));
        assert!(out.contains("N/A"));
        assert!(out.contains("2023-11-14T22:13:20.000Z"));
        assert!(!out.contains(EMPTY_MESSAGE));
    }

    #[test]
    fn loading_and_errors_are_visible() {
        let mut v = view(vec![row(0, "Bo", false, 1)]);
        v.loading = true;
        v.last_error = Some("/api/nodes: HTTP 500".into());

        let out = render(&v, Some("could not unregister: /api/nodes: HTTP 500"), &InputState::new());
        assert!(out.contains("refreshing"));
        assert!(out.contains("refresh failed: /api/nodes: HTTP 500"));
        assert!(out.contains("could not unregister"));
    }

    #[test]
    fn prompt_mode_shows_name_entry() {
        let mut input = InputState::new();
        input.start_prompt("Ana");
        let out = render(&view(vec![]), None, &input);
        assert!(out.contains("Name: Ana"));
    }
}
