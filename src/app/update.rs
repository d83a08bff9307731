use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::api::ApiClient;
use crate::app::keymap::{KeyAction, Keymap};
use crate::app::{AppConfig, AppState, FormField, InputMode, ModalState, Theme};
use crate::cache::{Mutation, QueryCache, USERS_KEY};
use crate::ui;

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    config: &AppConfig,
) -> Result<()> {
    let store = ApiClient::new(&config.base_url);
    let cache = QueryCache::new(store);
    let theme = Theme::load_or_init(&config.theme_path);
    let keymap = Keymap::load_or_init(&config.keybinds_path);
    let mut app = AppState::new(cache, theme, keymap);

    loop {
        app.tick();

        terminal.draw(|f| {
            ui::render(f, &mut app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(&mut app, key);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Route a key press according to the current input mode.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, key),
        InputMode::Form => handle_form_key(app, key.code),
        InputMode::Modal => handle_modal_key(app, key.code),
    }
}

fn handle_normal_key(app: &mut AppState, key: KeyEvent) {
    let Some(action) = app.keymap.resolve(&key) else {
        return;
    };
    match action {
        KeyAction::Quit => app.should_quit = true,
        KeyAction::MoveUp => {
            if app.selected_index > 0 {
                app.selected_index -= 1;
            }
        }
        KeyAction::MoveDown => {
            if app.selected_index + 1 < app.records.len() {
                app.selected_index += 1;
            }
        }
        KeyAction::PageUp => {
            let rpp = app.rows_per_page.max(1);
            if app.selected_index >= rpp {
                app.selected_index -= rpp;
            } else {
                app.selected_index = 0;
            }
        }
        KeyAction::PageDown => {
            let rpp = app.rows_per_page.max(1);
            let new_idx = app.selected_index.saturating_add(rpp);
            app.selected_index = new_idx.min(app.records.len().saturating_sub(1));
        }
        KeyAction::NewRecord => {
            app.form.reset();
            app.input_mode = InputMode::Form;
        }
        KeyAction::EditRecord => {
            if let Some(record) = app.selected_record().cloned() {
                app.form.load(&record);
                app.input_mode = InputMode::Form;
            }
        }
        KeyAction::DeleteRecord => {
            if let Some(record) = app.selected_record().cloned() {
                // Default to No, like every confirmation should.
                app.modal = Some(ModalState::DeleteConfirm {
                    id: record.id,
                    name: record.name,
                    selected: 1,
                });
                app.input_mode = InputMode::Modal;
            }
        }
        KeyAction::Refresh => app.cache.invalidate(USERS_KEY),
        KeyAction::Ignore => {}
    }
}

fn handle_form_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            // Cancel clears the pending edit target along with the fields.
            app.form.reset();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Tab | KeyCode::BackTab => app.form.toggle_focus(),
        KeyCode::Up => app.form.focus = FormField::Name,
        KeyCode::Down => app.form.focus = FormField::Email,
        KeyCode::Enter => submit_form(app),
        KeyCode::Backspace => app.form.backspace(),
        KeyCode::Char(c) => app.form.input(c),
        _ => {}
    }
}

fn submit_form(app: &mut AppState) {
    if app.saving {
        return;
    }
    if let Some(mutation) = app.form.submit() {
        app.cache.mutate(USERS_KEY, mutation);
        app.saving = true;
    }
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    match &mut app.modal {
        Some(ModalState::DeleteConfirm { id, selected, .. }) => match code {
            KeyCode::Esc => close_modal(app),
            KeyCode::Left | KeyCode::Right => {
                *selected = if *selected == 0 { 1 } else { 0 };
            }
            KeyCode::Enter => {
                let confirmed = *selected == 0;
                let target = id.clone();
                close_modal(app);
                if confirmed {
                    app.cache.mutate(USERS_KEY, Mutation::Delete { id: target });
                    app.saving = true;
                }
            }
            _ => {}
        },
        None => {}
    }
}

fn close_modal(app: &mut AppState) {
    app.modal = None;
    app.input_mode = InputMode::Normal;
}
