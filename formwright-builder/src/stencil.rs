//! Stencils: reusable form starting points.
//!
//! A stencil captures a full builder payload under its own handle; new
//! forms are seeded from it. Stencil handles share the form handle
//! namespace and get the same collision remediation.

use formwright_common::handles::unique_handle;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::form::{FormDefinition, FormPayload};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stencil {
    pub id: Ulid,
    pub handle: String,
    pub title: String,
    pub payload: FormPayload,
}

impl Stencil {
    /// Create a stencil, resolving the wanted handle against handles
    /// already in use.
    pub fn new(
        existing_handles: &[String],
        wanted_handle: &str,
        title: impl Into<String>,
        payload: FormPayload,
    ) -> Self {
        Self {
            id: Ulid::new(),
            handle: unique_handle(existing_handles, wanted_handle),
            title: title.into(),
            payload,
        }
    }

    /// Seed a new form from this stencil. The form gets a fresh id and
    /// its own resolved handle; the payload tree is copied as-is.
    pub fn instantiate(&self, existing_handles: &[String], form_handle: &str) -> FormDefinition {
        let mut form = FormDefinition::new(
            unique_handle(existing_handles, form_handle),
            self.title.clone(),
        );
        form.settings = self.payload.settings.clone();
        form.pages = self.payload.pages.clone();
        form.notifications = self.payload.notifications.clone();
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FieldConfig, PageConfig, RowConfig};
    use serde_json::json;

    fn payload() -> FormPayload {
        FormPayload {
            pages: vec![PageConfig {
                label: "Page 1".into(),
                rows: vec![RowConfig {
                    fields: vec![FieldConfig {
                        type_name: "email".into(),
                        handle: "email".into(),
                        settings: json!({"label": "Email"}),
                    }],
                }],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn stencil_handle_resolves_collisions() {
        let existing = vec!["contact".to_string()];
        let stencil = Stencil::new(&existing, "contact", "Contact", payload());
        assert_eq!(stencil.handle, "contact1");
    }

    #[test]
    fn instantiate_copies_the_tree_with_a_fresh_identity() {
        let stencil = Stencil::new(&[], "contact", "Contact", payload());
        let form = stencil.instantiate(&[], "enquiry");
        assert_eq!(form.handle, "enquiry");
        assert_ne!(form.id, stencil.id);
        assert_eq!(form.field_handles(), vec!["email"]);
    }
}
