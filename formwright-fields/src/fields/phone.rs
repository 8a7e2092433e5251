//! Phone number field. Text contract with a permissive number-shape
//! check; no country-specific formatting.

use formwright_common::error::Result;
use formwright_schema::{helpers, FieldSchema};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::field::{
    normalize_text, serialize_text, value_as_text, BaseSettings, FormField, RenderContext,
    RenderTag,
};

// Optional leading +, then digits with common separators; 7..20 digits.
static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 ().\-]{5,24}$").expect("phone pattern is valid"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PhoneSettings {
    #[serde(flatten)]
    pub base: BaseSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Phone {
    handle: String,
    settings: PhoneSettings,
}

impl Phone {
    pub const TYPE: &'static str = "phone";

    pub fn new(handle: impl Into<String>, settings: PhoneSettings) -> Self {
        Self {
            handle: handle.into(),
            settings,
        }
    }

    pub fn from_settings(handle: String, settings: Value) -> Result<Box<dyn FormField>> {
        let settings: PhoneSettings = serde_json::from_value(settings)?;
        Ok(Box::new(Self { handle, settings }))
    }
}

impl FormField for Phone {
    fn type_name(&self) -> &'static str {
        Self::TYPE
    }

    fn display_name(&self) -> &'static str {
        "Phone Number"
    }

    fn handle(&self) -> &str {
        &self.handle
    }

    fn base(&self) -> &BaseSettings {
        &self.settings.base
    }

    fn normalize(&self, raw: &Value) -> Result<Value> {
        normalize_text(&self.handle, raw)
    }

    fn serialize_value(&self, normalized: &Value) -> Result<Value> {
        serialize_text(&self.handle, normalized)
    }

    fn validate(&self, normalized: &Value) -> Vec<String> {
        if normalized.is_null() {
            return Vec::new();
        }
        let text = value_as_text(normalized);
        if PHONE.is_match(text.trim()) {
            Vec::new()
        } else {
            vec!["Please enter a valid phone number.".to_string()]
        }
    }

    fn schema(&self) -> FieldSchema {
        FieldSchema::new()
            .general(vec![
                helpers::label_field(),
                helpers::placeholder_field(),
                helpers::default_value_field(),
            ])
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
            "fieldInput" => {
                let id = self.html_id(ctx);
                let classes = if ctx.errors {
                    json!(["fui-input", "fui-error"])
                } else {
                    json!(["fui-input"])
                };
                let mut tag = RenderTag::new("input")
                    .attr("type", "tel")
                    .attr("id", id.clone())
                    .attr("class", classes)
                    .attr("name", self.handle.clone())
                    .attr(
                        "placeholder",
                        self.settings
                            .placeholder
                            .clone()
                            .map(Value::from)
                            .unwrap_or(Value::Null),
                    )
                    .attr("data-fui-id", self.html_data_id(ctx))
                    .attr(
                        "data-fui-message",
                        base.error_message.clone().map(Value::from).unwrap_or(Value::Null),
                    );
                if base.required {
                    tag = tag.attr("required", true);
                }
                if base.instructions.is_some() {
                    tag = tag.attr("aria-describedby", format!("{id}-instructions"));
                }
                Some(tag)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_common_formats() {
        let field = Phone::new("phone", PhoneSettings::default());
        for good in ["+1 (555) 123-4567", "0412 345 678", "5551234567"] {
            assert!(field.validate(&json!(good)).is_empty(), "rejected {good:?}");
        }
    }

    #[test]
    fn rejects_non_numbers() {
        let field = Phone::new("phone", PhoneSettings::default());
        for bad in ["call me", "123", "+"] {
            assert_eq!(
                field.validate(&json!(bad)),
                vec!["Please enter a valid phone number."],
                "expected rejection for {bad:?}"
            );
        }
    }

    #[test]
    fn input_type_is_tel() {
        let field = Phone::new("phone", PhoneSettings::default());
        let tag = field
            .render_attributes("fieldInput", &RenderContext::new("f"))
            .unwrap();
        assert_eq!(tag.attributes["type"], json!("tel"));
    }
}
