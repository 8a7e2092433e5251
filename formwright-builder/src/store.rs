//! Storage collaborator boundary.
//!
//! Persistence is external to the core: callers hand the engine any
//! [`FormStore`]. Calls are synchronous; every pass operates within one
//! logical request, so there is no cross-request shared state here.

use formwright_common::error::{FormwrightError, Result};
use indexmap::IndexMap;
use ulid::Ulid;

use crate::form::FormDefinition;

pub trait FormStore {
    fn load_form(&self, id: Ulid) -> Result<FormDefinition>;

    fn save_form(&mut self, form: FormDefinition) -> Result<()>;

    /// Handles of every stored form, optionally excluding one form
    /// (so a form being edited does not collide with itself).
    fn list_handles(&self, excluding: Option<Ulid>) -> Vec<String>;
}

/// In-memory store, primarily for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryFormStore {
    forms: IndexMap<Ulid, FormDefinition>,
}

impl MemoryFormStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

impl FormStore for MemoryFormStore {
    fn load_form(&self, id: Ulid) -> Result<FormDefinition> {
        self.forms
            .get(&id)
            .cloned()
            .ok_or_else(|| FormwrightError::NotFound {
                kind: "form",
                id: id.to_string(),
            })
    }

    fn save_form(&mut self, form: FormDefinition) -> Result<()> {
        self.forms.insert(form.id, form);
        Ok(())
    }

    fn list_handles(&self, excluding: Option<Ulid>) -> Vec<String> {
        self.forms
            .values()
            .filter(|form| Some(form.id) != excluding)
            .map(|form| form.handle.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_form_is_not_found() {
        let store = MemoryFormStore::new();
        let err = store.load_form(Ulid::new()).unwrap_err();
        assert!(matches!(err, FormwrightError::NotFound { kind: "form", .. }));
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut store = MemoryFormStore::new();
        let form = FormDefinition::new("contact", "Contact");
        let id = form.id;
        store.save_form(form.clone()).unwrap();
        assert_eq!(store.load_form(id).unwrap(), form);
    }

    #[test]
    fn list_handles_excludes_the_named_form() {
        let mut store = MemoryFormStore::new();
        let a = FormDefinition::new("alpha", "Alpha");
        let b = FormDefinition::new("beta", "Beta");
        let a_id = a.id;
        store.save_form(a).unwrap();
        store.save_form(b).unwrap();
        assert_eq!(store.list_handles(Some(a_id)), vec!["beta"]);
        assert_eq!(store.list_handles(None), vec!["alpha", "beta"]);
    }
}
