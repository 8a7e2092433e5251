//! # Formwright Schema
//!
//! The declarative configuration surface of a field type: grouped schema
//! entries describing controls, constraints, and conditional visibility.
//! The builder UI renders these without knowing concrete field types; the
//! server re-checks the same constraints at save time.
//!
//! Visibility predicates are small expressions over sibling entries' live
//! values (`limit`, `minType == characters`, `a && !b`). The evaluator is
//! stateless and re-run on every configuration edit.

pub mod condition;
pub mod helpers;
pub mod types;
pub mod validate;

pub use condition::{Condition, ConditionParseError};
pub use types::{
    ConstraintSet, Control, FieldSchema, SchemaField, SchemaGroup, SelectOption,
};
pub use validate::{validate_settings, SettingsIssue};
