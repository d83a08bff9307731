// Unit tests for roster-manager
// These tests drive the public API: form controller, page controller and
// rendering, with an in-memory store standing in for the HTTP client.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

use roster_manager::api::{RemoteStore, UserDraft, UserRecord};
use roster_manager::app::keymap::Keymap;
use roster_manager::app::update::handle_key;
use roster_manager::app::{AppState, FormMode, InputMode, ModalState, Theme};
use roster_manager::cache::QueryCache;
use roster_manager::error::ApiError;

/// In-memory store with call counters, shared by the tests below.
#[derive(Clone, Default)]
struct MemStore {
    records: Arc<Mutex<Vec<UserRecord>>>,
    next_id: Arc<AtomicUsize>,
    create_calls: Arc<AtomicUsize>,
    update_calls: Arc<AtomicUsize>,
    delete_calls: Arc<AtomicUsize>,
    list_calls: Arc<AtomicUsize>,
}

impl MemStore {
    fn seed(records: &[(&str, &str, &str)]) -> Self {
        let store = Self::default();
        {
            let mut guard = store.records.lock().unwrap();
            for (id, name, email) in records {
                guard.push(UserRecord {
                    id: id.to_string(),
                    name: name.to_string(),
                    email: email.to_string(),
                });
            }
        }
        store.next_id.store(records.len() + 1, Ordering::SeqCst);
        store
    }
}

impl RemoteStore for MemStore {
    fn list(&self) -> Result<Vec<UserRecord>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.lock().unwrap().clone())
    }

    fn create(&self, draft: &UserDraft) -> Result<UserRecord, ApiError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = UserRecord {
            id: id.to_string(),
            name: draft.name.clone(),
            email: draft.email.clone(),
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    fn update(&self, id: &str, draft: &UserDraft) -> Result<UserRecord, ApiError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(ApiError::NotFound)?;
        record.name = draft.name.clone();
        record.email = draft.email.clone();
        Ok(record.clone())
    }

    fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }
}

fn new_app(store: MemStore) -> AppState {
    AppState::new(QueryCache::new(store), Theme::dark(), Keymap::new_defaults())
}

fn tick_until<F: Fn(&AppState) -> bool>(app: &mut AppState, pred: F) {
    let start = Instant::now();
    loop {
        app.tick();
        if pred(app) {
            return;
        }
        assert!(
            start.elapsed() < Duration::from_secs(2),
            "timed out waiting for app state"
        );
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_text(app: &mut AppState, text: &str) {
    for c in text.chars() {
        handle_key(app, key(KeyCode::Char(c)));
    }
}

fn render_to_text(app: &mut AppState) -> String {
    let backend = TestBackend::new(80, 24);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|f| roster_manager::ui::render(f, app))
        .unwrap();
    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for (i, cell) in buffer.content.iter().enumerate() {
        out.push_str(cell.symbol());
        if (i + 1) % buffer.area.width as usize == 0 {
            out.push('\n');
        }
    }
    out
}

// 1) Invalid input blocks submission and issues no API call
#[test]
fn invalid_form_blocks_submission_without_api_call() {
    let store = MemStore::default();
    let create_calls = store.create_calls.clone();
    let mut app = new_app(store);
    tick_until(&mut app, |a| a.list_loaded);

    handle_key(&mut app, key(KeyCode::Char('n')));
    assert_eq!(app.input_mode, InputMode::Form);

    type_text(&mut app, "A");
    handle_key(&mut app, key(KeyCode::Tab));
    type_text(&mut app, "not-an-email");
    handle_key(&mut app, key(KeyCode::Enter));

    assert_eq!(
        app.form.errors.name.as_deref(),
        Some("Name must be at least 2 characters")
    );
    assert_eq!(app.form.errors.email.as_deref(), Some("Invalid email address"));
    assert!(!app.saving);
    assert_eq!(create_calls.load(Ordering::SeqCst), 0);

    // After the failed attempt, the focused field re-validates on change.
    type_text(&mut app, "@x.com");
    assert!(app.form.errors.email.is_none());
}

// 2) A valid create issues exactly one create-call and one refetch, then clears the form
#[test]
fn valid_create_issues_one_call_and_one_refetch() {
    let store = MemStore::default();
    let create_calls = store.create_calls.clone();
    let list_calls = store.list_calls.clone();
    let mut app = new_app(store);
    tick_until(&mut app, |a| a.list_loaded);

    handle_key(&mut app, key(KeyCode::Char('n')));
    type_text(&mut app, "Ann");
    handle_key(&mut app, key(KeyCode::Tab));
    type_text(&mut app, "ann@x.com");
    handle_key(&mut app, key(KeyCode::Enter));

    tick_until(&mut app, |a| !a.saving && a.records.len() == 1);
    assert_eq!(create_calls.load(Ordering::SeqCst), 1);
    // Initial fetch plus exactly one invalidation-driven refetch.
    assert_eq!(list_calls.load(Ordering::SeqCst), 2);
    assert_eq!(app.records[0].name, "Ann");
    assert_eq!(app.records[0].email, "ann@x.com");

    // Form is back to blank Create mode.
    assert_eq!(app.form.mode, FormMode::Create);
    assert!(app.form.name.is_empty());
    assert!(app.form.email.is_empty());
}

// 3) Edit pre-fills the form and a valid submission updates that id, not a create
#[test]
fn edit_prefills_and_updates_by_id() {
    let store = MemStore::seed(&[("1", "Ann", "ann@x.com"), ("2", "Bob", "bob@x.com")]);
    let records = store.records.clone();
    let create_calls = store.create_calls.clone();
    let update_calls = store.update_calls.clone();
    let mut app = new_app(store);
    tick_until(&mut app, |a| a.records.len() == 2);

    handle_key(&mut app, key(KeyCode::Down));
    handle_key(&mut app, key(KeyCode::Char('e')));
    assert_eq!(app.input_mode, InputMode::Form);
    assert_eq!(app.form.mode, FormMode::Edit { id: "2".to_string() });
    assert_eq!(app.form.name, "Bob");
    assert_eq!(app.form.email, "bob@x.com");

    for _ in 0.."Bob".len() {
        handle_key(&mut app, key(KeyCode::Backspace));
    }
    type_text(&mut app, "Robert");
    handle_key(&mut app, key(KeyCode::Enter));

    tick_until(&mut app, |a| {
        !a.saving && a.records.iter().any(|r| r.name == "Robert")
    });
    assert_eq!(update_calls.load(Ordering::SeqCst), 1);
    assert_eq!(create_calls.load(Ordering::SeqCst), 0);
    let server = records.lock().unwrap();
    assert_eq!(server.len(), 2);
    assert_eq!(server[1].id, "2");
    assert_eq!(server[1].name, "Robert");
    drop(server);

    // Successful update transitions back to blank Create mode.
    assert_eq!(app.form.mode, FormMode::Create);
    assert!(app.form.name.is_empty());
}

// 4) Cancelling the edit clears the pending edit target without any call
#[test]
fn cancel_edit_returns_to_blank_create_mode() {
    let store = MemStore::seed(&[("1", "Ann", "ann@x.com")]);
    let update_calls = store.update_calls.clone();
    let mut app = new_app(store);
    tick_until(&mut app, |a| a.records.len() == 1);

    handle_key(&mut app, key(KeyCode::Char('e')));
    assert!(app.form.edit_target().is_some());

    handle_key(&mut app, key(KeyCode::Esc));
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.form.mode, FormMode::Create);
    assert!(app.form.name.is_empty());
    assert_eq!(update_calls.load(Ordering::SeqCst), 0);
}

// 5) Confirming delete issues exactly one delete-call; cancelling issues none
#[test]
fn delete_confirm_and_cancel() {
    let store = MemStore::seed(&[("1", "Ann", "ann@x.com")]);
    let delete_calls = store.delete_calls.clone();
    let mut app = new_app(store);
    tick_until(&mut app, |a| a.records.len() == 1);

    // Cancel path: open the confirmation, then back out.
    handle_key(&mut app, key(KeyCode::Char('d')));
    assert!(matches!(
        app.modal,
        Some(ModalState::DeleteConfirm { ref id, selected: 1, .. }) if id == "1"
    ));
    // While the modal is open, list keys are not interpreted.
    handle_key(&mut app, key(KeyCode::Char('d')));
    assert_eq!(app.input_mode, InputMode::Modal);
    handle_key(&mut app, key(KeyCode::Esc));
    assert!(app.modal.is_none());
    assert_eq!(delete_calls.load(Ordering::SeqCst), 0);

    // Confirm path: Yes is selected with an arrow, Enter dispatches.
    handle_key(&mut app, key(KeyCode::Char('d')));
    handle_key(&mut app, key(KeyCode::Left));
    handle_key(&mut app, key(KeyCode::Enter));
    assert!(app.modal.is_none());

    tick_until(&mut app, |a| a.records.is_empty());
    assert_eq!(delete_calls.load(Ordering::SeqCst), 1);
}

// 6) The three list states render as loading / empty / populated
#[test]
fn list_states_render() {
    // Loading: first fetch still out, no snapshot yet.
    let mut app = new_app(MemStore::default());
    app.tick();
    let text = render_to_text(&mut app);
    assert!(text.contains("Loading users…"), "got:\n{text}");

    // Empty: resolved with zero records.
    tick_until(&mut app, |a| a.list_loaded);
    let text = render_to_text(&mut app);
    assert!(text.contains("No users found."), "got:\n{text}");
    assert!(!text.contains("Loading users…"));

    // Populated: one row with both fields and the actions.
    let mut app = new_app(MemStore::seed(&[("1", "Ann", "ann@x.com")]));
    tick_until(&mut app, |a| a.records.len() == 1);
    let text = render_to_text(&mut app);
    assert_eq!(text.matches("ann@x.com").count(), 1, "got:\n{text}");
    assert_eq!(text.matches("[Edit] [Delete]").count(), 1);
    assert!(text.contains("Ann"));
    assert!(!text.contains("No users found."));
}

// 7) Validation messages appear inline in the form
#[test]
fn form_errors_render_inline() {
    let mut app = new_app(MemStore::default());
    tick_until(&mut app, |a| a.list_loaded);

    handle_key(&mut app, key(KeyCode::Char('n')));
    type_text(&mut app, "A");
    handle_key(&mut app, key(KeyCode::Enter));

    let text = render_to_text(&mut app);
    assert!(text.contains("Name must be at least 2 characters"));
    assert!(text.contains("Invalid email address"));
}

// 8) Mutation outcomes surface as status-bar notices
#[test]
fn delete_outcome_shows_notice() {
    let store = MemStore::seed(&[("1", "Ann", "ann@x.com")]);
    let mut app = new_app(store);
    tick_until(&mut app, |a| a.records.len() == 1);

    handle_key(&mut app, key(KeyCode::Char('d')));
    handle_key(&mut app, key(KeyCode::Left));
    handle_key(&mut app, key(KeyCode::Enter));
    tick_until(&mut app, |a| a.notice.is_some());

    assert_eq!(app.notice.as_ref().unwrap().text, "User deleted");
}
