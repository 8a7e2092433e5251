//! Checkboxes field. Multi-select over a configured option list; the
//! normalized value is an array of option values.

use formwright_common::error::{FormwrightError, Result};
use formwright_schema::{helpers, FieldSchema};
use serde_json::{json, Map, Value};

use serde::{Deserialize, Serialize};

use crate::field::{BaseSettings, FormField, RenderContext, RenderTag};
use crate::fields::FieldOption;
use formwright_common::strings::{entities_to_text, text_to_entities};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckboxesSettings {
    #[serde(flatten)]
    pub base: BaseSettings,
    pub options: Vec<FieldOption>,
}

#[derive(Debug, Clone)]
pub struct Checkboxes {
    handle: String,
    settings: CheckboxesSettings,
}

impl Checkboxes {
    pub const TYPE: &'static str = "checkboxes";

    pub fn new(handle: impl Into<String>, settings: CheckboxesSettings) -> Self {
        Self {
            handle: handle.into(),
            settings,
        }
    }

    pub fn from_settings(handle: String, settings: Value) -> Result<Box<dyn FormField>> {
        let settings: CheckboxesSettings = serde_json::from_value(settings)?;
        Ok(Box::new(Self { handle, settings }))
    }

    fn decode_member(&self, raw: &Value) -> Result<Option<String>> {
        match raw {
            Value::Null => Ok(None),
            Value::String(s) if s.is_empty() => Ok(None),
            Value::String(s) => Ok(Some(entities_to_text(s))),
            Value::Number(n) => Ok(Some(n.to_string())),
            Value::Bool(b) => Ok(Some(b.to_string())),
            other => Err(FormwrightError::TypeMismatch {
                handle: self.handle.clone(),
                expected: "string",
                actual: FormwrightError::value_shape(other),
            }),
        }
    }
}

impl FormField for Checkboxes {
    fn type_name(&self) -> &'static str {
        Self::TYPE
    }

    fn display_name(&self) -> &'static str {
        "Checkboxes"
    }

    fn handle(&self) -> &str {
        &self.handle
    }

    fn base(&self) -> &BaseSettings {
        &self.settings.base
    }

    /// A scalar submission is promoted to a single-element array; an
    /// empty selection collapses to the null sentinel.
    fn normalize(&self, raw: &Value) -> Result<Value> {
        let members: Vec<String> = match raw {
            Value::Null => Vec::new(),
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    if let Some(text) = self.decode_member(item)? {
                        out.push(text);
                    }
                }
                out
            }
            scalar => self.decode_member(scalar)?.into_iter().collect(),
        };
        if members.is_empty() {
            Ok(Value::Null)
        } else {
            Ok(json!(members))
        }
    }

    fn serialize_value(&self, normalized: &Value) -> Result<Value> {
        match normalized {
            Value::Null => Ok(Value::Null),
            Value::Array(items) => {
                let encoded: Vec<Value> = items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => Value::String(text_to_entities(s)),
                        other => other.clone(),
                    })
                    .collect();
                Ok(Value::Array(encoded))
            }
            other => Err(FormwrightError::TypeMismatch {
                handle: self.handle.clone(),
                expected: "array",
                actual: FormwrightError::value_shape(other),
            }),
        }
    }

    fn validate(&self, normalized: &Value) -> Vec<String> {
        let Some(items) = normalized.as_array() else {
            return Vec::new();
        };
        let mut errors = Vec::new();
        for item in items {
            let text = item.as_str().unwrap_or_default();
            if !self.settings.options.iter().any(|o| o.value == text) {
                errors.push("Please select a valid option.".to_string());
                break;
            }
        }
        errors
    }

    fn schema(&self) -> FieldSchema {
        FieldSchema::new()
            .general(vec![helpers::label_field(), helpers::options_table()])
            .settings(vec![
                helpers::required_field(),
                helpers::error_message_field(),
            ])
            .appearance(vec![
                helpers::visibility_field(),
                helpers::label_position_field(),
                helpers::instructions_field(),
            ])
            .advanced(vec![helpers::handle_field(), helpers::css_classes_field()])
            .conditions(vec![
                helpers::enable_conditions_field(),
                helpers::conditions_field(),
            ])
    }

    fn settings_values(&self) -> Map<String, Value> {
        serde_json::to_value(&self.settings)
            .ok()
            .and_then(|v| v.as_object().cloned())
            .unwrap_or_default()
    }

    fn render_attributes(&self, key: &str, ctx: &RenderContext) -> Option<RenderTag> {
        let base = &self.settings.base;
        match key {
            // Wrapping fieldset; individual inputs are produced per option
            // by the template layer.
            "fieldInput" => {
                let classes = if ctx.errors {
                    json!(["fui-fieldset", "fui-error"])
                } else {
                    json!(["fui-fieldset"])
                };
                let mut tag = RenderTag::new("fieldset")
                    .attr("id", self.html_id(ctx))
                    .attr("class", classes)
                    .attr("data-fui-id", self.html_data_id(ctx))
                    .attr(
                        "data-fui-message",
                        base.error_message.clone().map(Value::from).unwrap_or(Value::Null),
                    );
                if base.required {
                    tag = tag.attr("data-required", true);
                }
                Some(tag)
            }
            _ => None,
        }
    }
}
