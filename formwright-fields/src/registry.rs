//! Field type registry.
//!
//! Maps wire type names to factories and backs the builder's catalog of
//! available types. Registration order is preserved so the catalog
//! renders in a stable order.

use formwright_common::error::{FormwrightError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::field::FormField;
use crate::fields::{
    Checkboxes, Dropdown, Email, Hidden, MultiLineText, NumberField, Phone, SingleLineText,
};

type FieldFactory = fn(String, Value) -> Result<Box<dyn FormField>>;

/// Catalog entry describing one registered field type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTypeInfo {
    pub type_name: String,
    pub display_name: String,
}

pub struct FieldRegistry {
    factories: IndexMap<&'static str, (&'static str, FieldFactory)>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self {
            factories: IndexMap::new(),
        }
    }

    /// Registry preloaded with the built-in field types.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(
            SingleLineText::TYPE,
            "Single-line Text",
            SingleLineText::from_settings,
        );
        registry.register(
            MultiLineText::TYPE,
            "Multi-line Text",
            MultiLineText::from_settings,
        );
        registry.register(Email::TYPE, "Email Address", Email::from_settings);
        registry.register(NumberField::TYPE, "Number", NumberField::from_settings);
        registry.register(Phone::TYPE, "Phone Number", Phone::from_settings);
        registry.register(Dropdown::TYPE, "Dropdown", Dropdown::from_settings);
        registry.register(Checkboxes::TYPE, "Checkboxes", Checkboxes::from_settings);
        registry.register(Hidden::TYPE, "Hidden", Hidden::from_settings);
        registry
    }

    /// Later registrations replace earlier ones for the same type name.
    pub fn register(
        &mut self,
        type_name: &'static str,
        display_name: &'static str,
        factory: FieldFactory,
    ) {
        if self
            .factories
            .insert(type_name, (display_name, factory))
            .is_some()
        {
            debug!(type_name, "replaced field type registration");
        }
    }

    /// Instantiate a field of the named type with the given settings
    /// payload.
    pub fn create(
        &self,
        type_name: &str,
        handle: String,
        settings: Value,
    ) -> Result<Box<dyn FormField>> {
        let (_, factory) =
            self.factories
                .get(type_name)
                .ok_or_else(|| FormwrightError::UnknownFieldType {
                    type_name: type_name.to_string(),
                })?;
        // An absent settings map means all defaults.
        let settings = if settings.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            settings
        };
        factory(handle, settings)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Catalog of registered types in registration order.
    pub fn catalog(&self) -> Vec<FieldTypeInfo> {
        self.factories
            .iter()
            .map(|(type_name, (display_name, _))| FieldTypeInfo {
                type_name: (*type_name).to_string(),
                display_name: (*display_name).to_string(),
            })
            .collect()
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_cover_builtin_types() {
        let registry = FieldRegistry::with_defaults();
        for type_name in [
            "single-line-text",
            "multi-line-text",
            "email",
            "number",
            "phone",
            "dropdown",
            "checkboxes",
            "hidden",
        ] {
            assert!(registry.contains(type_name), "missing {type_name}");
        }
    }

    #[test]
    fn create_dispatches_to_the_right_type() {
        let registry = FieldRegistry::with_defaults();
        let field = registry
            .create("email", "workEmail".to_string(), json!({"label": "Work Email"}))
            .unwrap();
        assert_eq!(field.type_name(), "email");
        assert_eq!(field.handle(), "workEmail");
        assert_eq!(field.base().label, "Work Email");
    }

    #[test]
    fn unknown_type_is_an_error() {
        let registry = FieldRegistry::with_defaults();
        let err = registry
            .create("signature-pad", "sig".to_string(), json!({}))
            .unwrap_err();
        assert!(matches!(
            err,
            FormwrightError::UnknownFieldType { ref type_name } if type_name == "signature-pad"
        ));
    }

    #[test]
    fn catalog_preserves_registration_order() {
        let registry = FieldRegistry::with_defaults();
        let catalog = registry.catalog();
        assert_eq!(catalog[0].type_name, "single-line-text");
        assert_eq!(catalog[0].display_name, "Single-line Text");
        assert_eq!(catalog.len(), 8);
    }

    #[test]
    fn absent_settings_decode_as_defaults() {
        let registry = FieldRegistry::with_defaults();
        let field = registry
            .create("single-line-text", "notes".to_string(), Value::Null)
            .unwrap();
        assert!(field.base().label.is_empty());
        assert!(!field.base().required);
    }

    #[test]
    fn malformed_settings_surface_a_decode_error() {
        let registry = FieldRegistry::with_defaults();
        let err = registry
            .create("number", "qty".to_string(), json!({"limit": "definitely"}))
            .unwrap_err();
        assert!(matches!(err, FormwrightError::Decode(_)));
    }
}
