//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Bindings only apply to Normal (list) mode — while the form or a modal has
//! focus, keys are interpreted literally so typing is never remapped.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Semantic keyboard actions that can be bound to key combinations.
///
/// Multiple key combinations can map to the same action (e.g. both 'j' and
/// Down arrow move down).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Start a blank form to create a record.
    NewRecord,
    /// Edit the currently selected record.
    EditRecord,
    /// Ask to delete the currently selected record.
    DeleteRecord,
    /// Invalidate the list and refetch from the server.
    Refresh,
    /// Move up in the list.
    MoveUp,
    /// Move down in the list.
    MoveDown,
    /// Move to the previous page of results.
    PageUp,
    /// Move to the next page of results.
    PageDown,
    /// Ignore this key.
    Ignore,
}

/// Manages keybinding configuration and key-to-action resolution.
#[derive(Clone, Debug)]
pub struct Keymap {
    /// Canonical mapping from (modifiers, code) to action.
    bindings: std::collections::HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Create a keymap with default keybindings.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = std::collections::HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('n')), KeyAction::NewRecord);
        bindings.insert((M::NONE, Char('e')), KeyAction::EditRecord);
        bindings.insert((M::NONE, Enter), KeyAction::EditRecord);
        bindings.insert((M::NONE, Char('d')), KeyAction::DeleteRecord);
        bindings.insert((M::NONE, KeyCode::Delete), KeyAction::DeleteRecord);
        bindings.insert((M::NONE, Char('r')), KeyAction::Refresh);
        // Navigation, arrows and vim-like keys
        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, PageUp), KeyAction::PageUp);
        bindings.insert((M::NONE, PageDown), KeyAction::PageDown);

        Self { bindings }
    }

    /// Load a keymap from a file, or write the defaults there if it is missing.
    pub fn load_or_init(path: &str) -> Self {
        let p = std::path::Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        let _ = km.write_file(path);
        km
    }

    /// Load a keymap from a configuration file.
    ///
    /// The file uses the format `<Action> = <KeySpec>`. The method starts from
    /// defaults and overrides with user-specified bindings.
    ///
    /// Returns `Some(keymap)` if the file exists and is readable; `None` otherwise.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let lhs = parts.next().map(|s| s.trim()).unwrap_or("");
            let rhs = parts.next().map(|s| s.trim()).unwrap_or("");
            if lhs.is_empty() || rhs.is_empty() {
                continue;
            }
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
            }
        }
        Some(map)
    }

    /// Export the current keymap to a human-readable config file.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# roster-manager keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+q, Enter, Esc, Up, Down, PageUp, PageDown, Delete, n, e, d, r, j, k\n");
        buf.push_str("# Actions: Quit, NewRecord, EditRecord, DeleteRecord, Refresh, MoveUp, MoveDown, PageUp, PageDown, Ignore\n\n");

        // Emit a stable, readable subset of current bindings
        let dump = [
            ("q", KeyAction::Quit),
            ("Esc", KeyAction::Ignore),
            ("n", KeyAction::NewRecord),
            ("e", KeyAction::EditRecord),
            ("Enter", KeyAction::EditRecord),
            ("d", KeyAction::DeleteRecord),
            ("Delete", KeyAction::DeleteRecord),
            ("r", KeyAction::Refresh),
            ("Up", KeyAction::MoveUp),
            ("Down", KeyAction::MoveDown),
            ("k", KeyAction::MoveUp),
            ("j", KeyAction::MoveDown),
            ("PageUp", KeyAction::PageUp),
            ("PageDown", KeyAction::PageDown),
        ];
        for (k, a) in dump {
            let _ = writeln!(&mut buf, "{} = {}", format_action(a), k);
        }

        std::fs::write(path, buf)
    }

    /// Resolve a key event (modifiers + code) to its bound action, if any.
    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let mut rest = s;
    let mut mods = KeyModifiers::NONE;
    if let Some(after) = s.strip_prefix("Ctrl+") {
        mods |= KeyModifiers::CONTROL;
        rest = after;
    }
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "Esc" | "Escape" => Esc,
        "Up" => Up,
        "Down" => Down,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let chars: Vec<char> = rest.chars().collect();
            if chars.len() == 1 {
                KeyCode::Char(chars[0])
            } else {
                return None;
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    match s.trim() {
        "Quit" => Some(KeyAction::Quit),
        "NewRecord" => Some(KeyAction::NewRecord),
        "EditRecord" => Some(KeyAction::EditRecord),
        "DeleteRecord" => Some(KeyAction::DeleteRecord),
        "Refresh" => Some(KeyAction::Refresh),
        "MoveUp" => Some(KeyAction::MoveUp),
        "MoveDown" => Some(KeyAction::MoveDown),
        "PageUp" => Some(KeyAction::PageUp),
        "PageDown" => Some(KeyAction::PageDown),
        "Ignore" => Some(KeyAction::Ignore),
        _ => None,
    }
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::NewRecord => "NewRecord",
        KeyAction::EditRecord => "EditRecord",
        KeyAction::DeleteRecord => "DeleteRecord",
        KeyAction::Refresh => "Refresh",
        KeyAction::MoveUp => "MoveUp",
        KeyAction::MoveDown => "MoveDown",
        KeyAction::PageUp => "PageUp",
        KeyAction::PageDown => "PageDown",
        KeyAction::Ignore => "Ignore",
    }
}
