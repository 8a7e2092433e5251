//! Handle resolution: reserved words, uniqueness, and length bounds.
//!
//! Handles are machine-readable identifiers, distinct from display labels.
//! Within a form every field handle must be unique and outside the
//! reserved-word set. Violations surface as validation issues, never as
//! storage-layer constraints.

/// Maximum length of a form handle.
pub const MAX_FORM_HANDLE_LENGTH: usize = 64;

/// Maximum length of a field handle.
pub const MAX_FIELD_HANDLE_LENGTH: usize = 64;

/// Handles disallowed for fields because they collide with system names.
pub const RESERVED_HANDLES: &[&str] = &[
    "id",
    "uid",
    "title",
    "handle",
    "form",
    "field",
    "status",
    "enabled",
    "settings",
    "dateCreated",
    "dateUpdated",
    "submission",
    "author",
    "content",
    "type",
    "fields",
    "pages",
    "rows",
    "notifications",
];

/// Whether a handle collides with a system-reserved name.
pub fn is_reserved_handle(handle: &str) -> bool {
    RESERVED_HANDLES.iter().any(|r| *r == handle)
}

/// Problems a proposed handle can have. These are reported as validation
/// issues rather than raised as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleIssue {
    /// Handle is empty
    Empty,
    /// Handle exceeds the maximum length
    TooLong {
        /// The configured maximum
        max: usize,
    },
    /// Handle collides with a reserved word
    Reserved,
    /// Handle is not a valid identifier (letter followed by letters,
    /// digits, or underscores)
    InvalidFormat,
}

impl std::fmt::Display for HandleIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandleIssue::Empty => write!(f, "Handle cannot be blank."),
            HandleIssue::TooLong { max } => {
                write!(f, "Handle is limited to {max} characters.")
            }
            HandleIssue::Reserved => write!(f, "Handle is a reserved word."),
            HandleIssue::InvalidFormat => write!(
                f,
                "Handle must start with a letter and contain only letters, numbers, and underscores."
            ),
        }
    }
}

/// Check a proposed handle against format, length, and the reserved set.
pub fn validate_handle(handle: &str, max_length: usize) -> std::result::Result<(), HandleIssue> {
    if handle.is_empty() {
        return Err(HandleIssue::Empty);
    }
    if handle.len() > max_length {
        return Err(HandleIssue::TooLong { max: max_length });
    }
    if is_reserved_handle(handle) {
        return Err(HandleIssue::Reserved);
    }
    let mut chars = handle.chars();
    let first_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !first_ok || !rest_ok {
        return Err(HandleIssue::InvalidFormat);
    }
    Ok(())
}

/// Resolve `wanted` to a handle unused by `existing` and outside the
/// reserved set, appending the first unused numeric suffix on collision.
///
/// `["email", "email1"]` + `"email"` resolves to `"email2"`.
pub fn unique_handle(existing: &[String], wanted: &str) -> String {
    let taken = |h: &str| is_reserved_handle(h) || existing.iter().any(|e| e == h);

    if !taken(wanted) {
        return wanted.to_string();
    }

    let mut suffix = 1u32;
    loop {
        let candidate = format!("{wanted}{suffix}");
        if !taken(&candidate) {
            tracing::debug!(wanted, resolved = %candidate, "handle collision resolved");
            return candidate;
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unused_handle_passes_through() {
        assert_eq!(unique_handle(&[], "email"), "email");
        assert_eq!(unique_handle(&["name".into()], "email"), "email");
    }

    #[test]
    fn collision_appends_first_unused_suffix() {
        let existing = vec!["email".to_string(), "email1".to_string()];
        assert_eq!(unique_handle(&existing, "email"), "email2");
    }

    #[test]
    fn resolved_handle_never_recollides() {
        let existing = vec![
            "email".to_string(),
            "email1".to_string(),
            "email2".to_string(),
            "email3".to_string(),
        ];
        let resolved = unique_handle(&existing, "email");
        assert_eq!(resolved, "email4");
        assert!(!existing.contains(&resolved));
    }

    #[test]
    fn reserved_word_is_renamed() {
        assert_eq!(unique_handle(&[], "title"), "title1");
    }

    #[test]
    fn validate_rejects_reserved() {
        assert_eq!(
            validate_handle("status", MAX_FIELD_HANDLE_LENGTH),
            Err(HandleIssue::Reserved)
        );
    }

    #[test]
    fn validate_rejects_bad_format() {
        assert_eq!(
            validate_handle("1email", MAX_FIELD_HANDLE_LENGTH),
            Err(HandleIssue::InvalidFormat)
        );
        assert_eq!(
            validate_handle("my-field", MAX_FIELD_HANDLE_LENGTH),
            Err(HandleIssue::InvalidFormat)
        );
        assert_eq!(
            validate_handle("", MAX_FIELD_HANDLE_LENGTH),
            Err(HandleIssue::Empty)
        );
    }

    #[test]
    fn validate_enforces_length() {
        let long = "a".repeat(MAX_FIELD_HANDLE_LENGTH + 1);
        assert_eq!(
            validate_handle(&long, MAX_FIELD_HANDLE_LENGTH),
            Err(HandleIssue::TooLong {
                max: MAX_FIELD_HANDLE_LENGTH
            })
        );
    }

    #[test]
    fn validate_accepts_camel_case() {
        assert!(validate_handle("emailAddress2", MAX_FIELD_HANDLE_LENGTH).is_ok());
        assert!(validate_handle("first_name", MAX_FIELD_HANDLE_LENGTH).is_ok());
    }
}
