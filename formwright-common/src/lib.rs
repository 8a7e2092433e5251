//! # Formwright Common
//!
//! Foundational types and utilities shared across the Formwright crates:
//! the error taxonomy, handle resolution (reserved words, uniqueness,
//! length bounds), and the string encoding helpers that keep server-side
//! length counting in agreement with the client.

pub mod error;
pub mod handles;
pub mod logging;
pub mod strings;

pub use error::{FormwrightError, Result};
pub use handles::{
    is_reserved_handle, unique_handle, validate_handle, HandleIssue, MAX_FIELD_HANDLE_LENGTH,
    MAX_FORM_HANDLE_LENGTH, RESERVED_HANDLES,
};
pub use logging::Pretty;
pub use strings::{collapse_whitespace, encoded_char_count, entities_to_text, text_to_entities};
