//! Application state types and entry glue.
//!
//! Defines the structs and enums that model the TUI state — the form
//! controller's Create/Edit state machine, the delete-confirmation modal,
//! list view flags mirrored from the cache — plus helpers to construct
//! defaults and to run the application loop (re-exported as `run`).

pub mod keymap;
pub mod update;

use std::time::Instant;

use ratatui::style::Color;

use crate::api::UserRecord;
use crate::cache::{CacheNotification, Mutation, MutationKind, QueryCache, USERS_KEY};
use crate::validate::{self, FieldErrors};

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    /// Navigating the list.
    Normal,
    /// Typing into the form fields.
    Form,
    /// A modal dialog has focus.
    Modal,
}

/// Which form field has focus while typing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
}

/// The form controller's mode: creating a new record, or editing an
/// existing one (carrying the pending edit target's id).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

/// State of the name/email form.
///
/// Transitions: `load` enters Edit mode pre-filled from a record; `reset`
/// returns to blank Create mode (used on cancel and after a successful
/// create or update). `submit` validates and, when clean, produces the
/// mutation to dispatch — it never talks to the network itself.
#[derive(Clone, Debug)]
pub struct FormState {
    pub mode: FormMode,
    pub name: String,
    pub email: String,
    pub focus: FormField,
    pub errors: FieldErrors,
    pub dirty: bool,
    /// Set on the first submission attempt; from then on the focused field
    /// re-validates on every change.
    pub submitted: bool,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            mode: FormMode::Create,
            name: String::new(),
            email: String::new(),
            focus: FormField::Name,
            errors: FieldErrors::default(),
            dirty: false,
            submitted: false,
        }
    }

    /// Blank Create mode, pristine.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Enter Edit mode pre-filled with the record's current values.
    pub fn load(&mut self, record: &UserRecord) {
        self.mode = FormMode::Edit {
            id: record.id.clone(),
        };
        self.name = record.name.clone();
        self.email = record.email.clone();
        self.focus = FormField::Name;
        self.errors = FieldErrors::default();
        self.dirty = false;
        self.submitted = false;
    }

    /// Id of the pending edit target, if in Edit mode.
    pub fn edit_target(&self) -> Option<&str> {
        match &self.mode {
            FormMode::Create => None,
            FormMode::Edit { id } => Some(id),
        }
    }

    pub fn input(&mut self, c: char) {
        match self.focus {
            FormField::Name => self.name.push(c),
            FormField::Email => self.email.push(c),
        }
        self.dirty = true;
        self.revalidate_focused();
    }

    pub fn backspace(&mut self) {
        match self.focus {
            FormField::Name => {
                self.name.pop();
            }
            FormField::Email => {
                self.email.pop();
            }
        }
        self.dirty = true;
        self.revalidate_focused();
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FormField::Name => FormField::Email,
            FormField::Email => FormField::Name,
        };
    }

    /// Validate and build the mutation to dispatch. Returns `None` (leaving
    /// per-field messages set) when validation fails — no call is issued.
    pub fn submit(&mut self) -> Option<Mutation> {
        self.submitted = true;
        match validate::validate(&self.name, &self.email) {
            Ok(draft) => {
                self.errors = FieldErrors::default();
                Some(match &self.mode {
                    FormMode::Create => Mutation::Create { draft },
                    FormMode::Edit { id } => Mutation::Update {
                        id: id.clone(),
                        draft,
                    },
                })
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    fn revalidate_focused(&mut self) {
        if !self.submitted {
            return;
        }
        match self.focus {
            FormField::Name => self.errors.name = validate::name_error(&self.name),
            FormField::Email => self.errors.email = validate::email_error(&self.email),
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

/// Modal dialog states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    /// The single pending-delete marker: which record awaits confirmation.
    /// `selected` is 0 for Yes, 1 for No.
    DeleteConfirm {
        id: String,
        name: String,
        selected: usize,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient status-bar message for mutation/fetch outcomes.
#[derive(Clone, Debug)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    pub shown_at: Instant,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Success,
            shown_at: Instant::now(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Error,
            shown_at: Instant::now(),
        }
    }
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub error_fg: Color,
    pub success_fg: Color,
}

impl Theme {
    /// Dark default theme.
    #[allow(dead_code)]
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            error_fg: Color::Red,
            success_fg: Color::Green,
        }
    }

    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            error_fg: Color::Rgb(0xf3, 0x8b, 0xa8),     // red
            success_fg: Color::Rgb(0xa6, 0xe3, 0xa1),   // green
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall back to `mocha`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() || val.is_empty() {
                continue;
            }
            if let Some(color) = Self::parse_color(val) {
                match key {
                    "text" => theme.text = color,
                    "muted" => theme.muted = color,
                    "title" => theme.title = color,
                    "border" => theme.border = color,
                    "header_bg" => theme.header_bg = color,
                    "header_fg" => theme.header_fg = color,
                    "status_bg" => theme.status_bg = color,
                    "status_fg" => theme.status_fg = color,
                    "highlight_fg" => theme.highlight_fg = color,
                    "highlight_bg" => theme.highlight_bg = color,
                    "error_fg" => theme.error_fg = color,
                    "success_fg" => theme.success_fg = color,
                    _ => {}
                }
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or special names: "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let t = s.trim();
        let lower = t.to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = if let Some(h) = lower.strip_prefix('#') {
            h
        } else {
            lower.as_str()
        };
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Some(Color::Rgb(r, g, b));
            }
        }
        None
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# roster-manager theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Reset => "reset".to_string(),
                // For named colors, emit a best-effort hex approximation
                Color::Black => "#000000".to_string(),
                Color::Red => "#FF0000".to_string(),
                Color::Green => "#00FF00".to_string(),
                Color::Yellow => "#FFFF00".to_string(),
                Color::Blue => "#0000FF".to_string(),
                Color::Magenta => "#FF00FF".to_string(),
                Color::Cyan => "#00FFFF".to_string(),
                Color::Gray => "#B3B3B3".to_string(),
                Color::DarkGray => "#4D4D4D".to_string(),
                Color::LightRed => "#FF6666".to_string(),
                Color::LightGreen => "#66FF66".to_string(),
                Color::LightYellow => "#FFFF66".to_string(),
                Color::LightBlue => "#6666FF".to_string(),
                Color::LightMagenta => "#FF66FF".to_string(),
                Color::LightCyan => "#66FFFF".to_string(),
                Color::White => "#FFFFFF".to_string(),
                Color::Indexed(i) => format!("index:{}", i),
            }
        }

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        };

        kv("text", self.text);
        kv("muted", self.muted);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);
        kv("error_fg", self.error_fg);
        kv("success_fg", self.success_fg);

        std::fs::write(path, buf)
    }

    /// Ensure a config file exists; if missing, write one with the current default theme and return it.
    /// If present, load from it; on parse errors, return `mocha`.
    pub fn load_or_init(path: &str) -> Self {
        let p = std::path::Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        let _ = t.write_file(path);
        t
    }
}

/// Runtime configuration resolved by the CLI layer.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub base_url: String,
    pub theme_path: String,
    pub keybinds_path: String,
}

/// How long a status-bar notice stays visible.
const NOTICE_TTL: std::time::Duration = std::time::Duration::from_secs(4);

pub struct AppState {
    pub cache: QueryCache,
    /// Snapshot of the cached list, mirrored each tick for rendering.
    pub records: Vec<UserRecord>,
    /// Whether any snapshot has ever been loaded (distinguishes the
    /// loading state from a genuinely empty list).
    pub list_loaded: bool,
    pub list_fetching: bool,
    pub list_error: bool,
    /// A mutation is being processed; submits are ignored meanwhile.
    pub saving: bool,
    pub selected_index: usize,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    pub form: FormState,
    pub modal: Option<ModalState>,
    pub notice: Option<Notice>,
    pub theme: Theme,
    pub keymap: keymap::Keymap,
    pub should_quit: bool,
}

impl AppState {
    /// Build the state around an injected cache (and therefore store); the
    /// cache is the only path to the network.
    pub fn new(cache: QueryCache, theme: Theme, keymap: keymap::Keymap) -> Self {
        Self {
            cache,
            records: Vec::new(),
            list_loaded: false,
            list_fetching: false,
            list_error: false,
            saving: false,
            selected_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            form: FormState::new(),
            modal: None,
            notice: None,
            theme,
            keymap,
            should_quit: false,
        }
    }

    /// Drain cache completions, react to them, and mirror the current query
    /// view into the render fields. Called once per event-loop tick.
    pub fn tick(&mut self) {
        for note in self.cache.poll() {
            self.apply_notification(note);
        }

        let view = self.cache.query(USERS_KEY);
        self.list_fetching = view.is_fetching;
        self.list_error = view.is_error;
        self.list_loaded = view.data.is_some();
        self.records = view.data.map(<[UserRecord]>::to_vec).unwrap_or_default();
        self.saving = self.cache.mutation_in_flight();

        if self.selected_index >= self.records.len() {
            self.selected_index = self.records.len().saturating_sub(1);
        }

        if self
            .notice
            .as_ref()
            .is_some_and(|n| n.shown_at.elapsed() > NOTICE_TTL)
        {
            self.notice = None;
        }
    }

    /// Currently selected record, if the list has one.
    pub fn selected_record(&self) -> Option<&UserRecord> {
        self.records.get(self.selected_index)
    }

    fn apply_notification(&mut self, note: CacheNotification) {
        match note {
            CacheNotification::Refetched { .. } => {}
            CacheNotification::FetchFailed { error, .. } => {
                self.notice = Some(Notice::error(format!("Failed to load users: {error}")));
            }
            CacheNotification::MutationSucceeded { kind } => {
                match kind {
                    MutationKind::Create => {
                        self.notice = Some(Notice::success("User added"));
                        self.form.reset();
                    }
                    MutationKind::Update => {
                        self.notice = Some(Notice::success("User updated"));
                        self.form.reset();
                    }
                    MutationKind::Delete => {
                        self.notice = Some(Notice::success("User deleted"));
                    }
                }
            }
            CacheNotification::MutationFailed { kind, error } => {
                let what = match kind {
                    MutationKind::Create => "add",
                    MutationKind::Update => "update",
                    MutationKind::Delete => "delete",
                };
                self.notice = Some(Notice::error(format!("Failed to {what} user: {error}")));
            }
        }
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
