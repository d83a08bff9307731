pub mod components;
pub mod form;
pub mod list;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(8),
                Constraint::Min(5),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.area());

    let hints = match app.input_mode {
        InputMode::Normal => "n: new; e/Enter: edit; d/Del: delete; r: refresh; q: quit",
        InputMode::Form => "Tab: switch field; Enter: save; Esc: cancel",
        InputMode::Modal => "Left/Right: choose; Enter: confirm; Esc: cancel",
    };
    let p = Paragraph::new(format!("users:{}  — {}", app.records.len(), hints))
        .block(
            Block::default()
                .title("roster-manager")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(
            Style::default()
                .fg(app.theme.header_fg)
                .bg(app.theme.header_bg),
        );
    f.render_widget(p, root[0]);

    form::render_form(f, root[1], app);
    list::render_list(f, root[2], app);
    components::render_status_bar(f, root[3], app);

    if app.modal.is_some() {
        components::render_delete_modal(f, f.area(), app);
    }
}
