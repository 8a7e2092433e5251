//! # Formwright Fields
//!
//! The polymorphic field-type contract and its implementations. Every
//! field type exposes the same surface (value normalization and
//! serialization, threshold-based validation rules selected by its
//! configuration, a declarative configuration schema, and a
//! rendering-attribute producer) so the builder and the submission
//! pipeline never special-case concrete types.

pub mod field;
pub mod fields;
pub mod registry;
pub mod rules;

pub use field::{BaseSettings, FormField, RenderContext, RenderTag};
pub use registry::{FieldRegistry, FieldTypeInfo};
pub use rules::{LimitSettings, LimitType, RuleKind, ValidationRule};
