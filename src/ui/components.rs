//! Shared UI components (status bar, modal helpers).

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::{AppState, FormMode, InputMode, ModalState, NoticeKind};

/// Render the bottom status bar with mode, counts and the current notice.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Form => match app.form.mode {
            FormMode::Create => "CREATE",
            FormMode::Edit { .. } => "EDIT",
        },
        InputMode::Modal => "CONFIRM",
    };

    let mut msg = format!("mode: {mode}  users:{}", app.records.len());
    if app.list_fetching {
        msg.push_str("  fetching…");
    }
    if app.saving {
        msg.push_str("  saving…");
    }

    let base = Style::default()
        .fg(app.theme.status_fg)
        .bg(app.theme.status_bg);
    let mut spans = vec![Span::styled(msg, base)];
    if let Some(notice) = &app.notice {
        let fg = match notice.kind {
            NoticeKind::Success => app.theme.success_fg,
            NoticeKind::Error => app.theme.error_fg,
        };
        spans.push(Span::styled(
            format!("  {}", notice.text),
            Style::default().fg(fg).bg(app.theme.status_bg),
        ));
    }

    let p = Paragraph::new(Line::from(spans)).style(base);
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the delete-confirmation dialog over the page.
pub fn render_delete_modal(f: &mut Frame, area: Rect, app: &AppState) {
    if let Some(ModalState::DeleteConfirm { name, selected, .. }) = &app.modal {
        let rect = centered_rect(50, 7, area);
        let yes = if *selected == 0 { "[Yes]" } else { " Yes " };
        let no = if *selected == 1 { "[No]" } else { " No  " };
        let body = format!("Delete user '{name}'?\n\n  {yes}    {no}");
        let p = Paragraph::new(body).wrap(Wrap { trim: false }).block(
            Block::default()
                .title("Confirm delete")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}
