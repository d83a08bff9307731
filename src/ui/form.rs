//! The name/email form with inline validation messages.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, FormField, FormMode, InputMode};

pub fn render_form(f: &mut Frame, area: Rect, app: &AppState) {
    let title = match app.form.mode {
        FormMode::Create => "Add user",
        FormMode::Edit { .. } => "Edit user",
    };

    let typing = app.input_mode == InputMode::Form;
    let marker = |field: FormField| {
        if typing && app.form.focus == field {
            "▶ "
        } else {
            "  "
        }
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(vec![
        Span::raw(format!("{}Name:  ", marker(FormField::Name))),
        Span::styled(
            app.form.name.clone(),
            Style::default().fg(app.theme.text),
        ),
    ]));
    if let Some(err) = &app.form.errors.name {
        lines.push(Line::from(Span::styled(
            format!("         {err}"),
            Style::default().fg(app.theme.error_fg),
        )));
    }
    lines.push(Line::from(vec![
        Span::raw(format!("{}Email: ", marker(FormField::Email))),
        Span::styled(
            app.form.email.clone(),
            Style::default().fg(app.theme.text),
        ),
    ]));
    if let Some(err) = &app.form.errors.email {
        lines.push(Line::from(Span::styled(
            format!("         {err}"),
            Style::default().fg(app.theme.error_fg),
        )));
    }

    lines.push(Line::raw(""));
    let action = match (&app.form.mode, app.saving) {
        (FormMode::Create, false) => "Add user (Enter)",
        (FormMode::Create, true) => "Adding…",
        (FormMode::Edit { .. }, false) => "Update user (Enter)",
        (FormMode::Edit { .. }, true) => "Updating…",
    };
    lines.push(Line::from(Span::styled(
        format!("  {action}"),
        Style::default()
            .fg(app.theme.muted)
            .add_modifier(Modifier::ITALIC),
    )));

    let p = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}
