//! The field-type contract.
//!
//! Every field type implements [`FormField`]: normalize raw submitted
//! data to a canonical value, serialize it for persistence, select
//! validation rules from configuration, describe its configuration
//! schema, and produce rendering attributes (tag + attribute map, never
//! markup).

use formwright_common::error::{FormwrightError, Result};
use formwright_common::strings::{entities_to_text, text_to_entities};
use formwright_schema::FieldSchema;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::rules::ValidationRule;

/// Settings every field type carries, decoded from the wire payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BaseSettings {
    pub label: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_classes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_position: Option<String>,
    /// Handle of another same-type field whose value this one must match.
    /// The builder keeps the pair in sync; the engine only records it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_field: Option<String>,
    pub enable_conditions: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Value>,
}

/// Context for rendering-attribute production.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Handle of the owning form, used for element id namespacing
    pub form_handle: &'a str,
    /// Whether the field currently has validation errors
    pub errors: bool,
}

impl<'a> RenderContext<'a> {
    pub fn new(form_handle: &'a str) -> Self {
        Self {
            form_handle,
            errors: false,
        }
    }

    pub fn with_errors(mut self, errors: bool) -> Self {
        self.errors = errors;
        self
    }
}

/// A tag-name plus attribute-map description of an element. Null-valued
/// attributes are omitted; markup generation is out of scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderTag {
    pub tag: String,
    pub attributes: IndexMap<String, Value>,
}

impl RenderTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: IndexMap::new(),
        }
    }

    /// Set an attribute, dropping nulls so optional attrs can be passed
    /// straight through.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = value.into();
        if !value.is_null() {
            self.attributes.insert(key.into(), value);
        }
        self
    }
}

/// The uniform behavior contract across all field implementations.
pub trait FormField: Send + Sync + std::fmt::Debug {
    /// The registry discriminator for this type.
    fn type_name(&self) -> &'static str;

    /// Human-facing name of the field type.
    fn display_name(&self) -> &'static str;

    /// This instance's handle, unique within the owning form.
    fn handle(&self) -> &str;

    /// Settings shared by all field types.
    fn base(&self) -> &BaseSettings;

    /// Convert raw submitted data into the canonical in-memory value.
    /// Idempotent; empty text becomes the null sentinel, never "".
    fn normalize(&self, raw: &Value) -> Result<Value>;

    /// Inverse-compatible encoding for persistence.
    fn serialize_value(&self, normalized: &Value) -> Result<Value>;

    /// Threshold rules selected by the current configuration.
    fn validation_rules(&self) -> Vec<ValidationRule> {
        Vec::new()
    }

    /// The fixed declarative configuration surface.
    fn schema(&self) -> FieldSchema;

    /// Current configuration values, for the builder payload.
    fn settings_values(&self) -> Map<String, Value>;

    /// Run all checks against a normalized value, accumulating messages.
    fn validate(&self, normalized: &Value) -> Vec<String> {
        let text = value_as_text(normalized);
        self.validation_rules()
            .iter()
            .filter_map(|rule| rule.check(&text))
            .collect()
    }

    /// Produce the element description for a render key ("fieldInput",
    /// "fieldLimit", ...). None when the key doesn't apply.
    fn render_attributes(&self, key: &str, ctx: &RenderContext) -> Option<RenderTag>;

    /// Namespaced element id for the primary input.
    fn html_id(&self, ctx: &RenderContext) -> String {
        format!("fields-{}-{}", ctx.form_handle, self.handle())
    }

    /// Data id used by client-side wiring.
    fn html_data_id(&self, ctx: &RenderContext) -> String {
        format!("{}-{}", ctx.form_handle, self.handle())
    }
}

/// Text form of a normalized value for rule checking. Null is "".
pub fn value_as_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Normalize raw input for text-like fields: decode numeric character
/// references, map empty to the null sentinel, stringify scalars.
/// Non-scalar input is a type mismatch.
pub fn normalize_text(handle: &str, raw: &Value) -> Result<Value> {
    match raw {
        Value::Null => Ok(Value::Null),
        Value::String(s) => {
            let decoded = entities_to_text(s);
            if decoded.is_empty() {
                Ok(Value::Null)
            } else {
                Ok(Value::String(decoded))
            }
        }
        Value::Number(n) => Ok(Value::String(n.to_string())),
        Value::Bool(b) => Ok(Value::String(b.to_string())),
        other => Err(FormwrightError::TypeMismatch {
            handle: handle.to_string(),
            expected: "string",
            actual: FormwrightError::value_shape(other),
        }),
    }
}

/// Serialize a normalized text value: encode non-ASCII as numeric
/// character references so stored length matches client-side counting.
pub fn serialize_text(handle: &str, normalized: &Value) -> Result<Value> {
    match normalized {
        Value::Null => Ok(Value::Null),
        Value::String(s) => Ok(Value::String(text_to_entities(s))),
        other => Err(FormwrightError::TypeMismatch {
            handle: handle.to_string(),
            expected: "string",
            actual: FormwrightError::value_shape(other),
        }),
    }
}
