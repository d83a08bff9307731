//! Validation rules for the user form, shared by the create and edit flows.
//!
//! Each field surfaces the first violated rule only. `validate` is the
//! submission gate: it either returns a normalized draft ready for the wire
//! or the set of per-field messages to render inline.

use crate::api::UserDraft;

/// Field-level validation messages. `None` means the field is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

/// First violated rule for the name field, if any.
pub fn name_error(name: &str) -> Option<String> {
    if name.trim().chars().count() < 2 {
        Some("Name must be at least 2 characters".to_string())
    } else {
        None
    }
}

/// First violated rule for the email field, if any.
pub fn email_error(email: &str) -> Option<String> {
    if is_valid_email(email.trim()) {
        None
    } else {
        Some("Invalid email address".to_string())
    }
}

/// Validate both fields; on success return the normalized (trimmed) draft.
pub fn validate(name: &str, email: &str) -> Result<UserDraft, FieldErrors> {
    let errors = FieldErrors {
        name: name_error(name),
        email: email_error(email),
    };
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(UserDraft {
        name: name.trim().to_string(),
        email: email.trim().to_string(),
    })
}

// Deliberately modest grammar: one '@', a non-empty local part, and a
// dotted domain with non-empty labels. Full RFC 5322 parsing is not the
// point of a client-side gate; the server remains the authority.
fn is_valid_email(s: &str) -> bool {
    if s.is_empty() || s.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = s.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let Some(domain) = parts.next() else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    if !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|label| !label.is_empty())
}
