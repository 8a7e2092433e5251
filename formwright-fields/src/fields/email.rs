//! Email address field. Text contract plus an address-shape check, and
//! eligible as a confirmation target for `matchField`.

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

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailSettings {
    #[serde(flatten)]
    pub base: BaseSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Email {
    handle: String,
    settings: EmailSettings,
}

impl Email {
    pub const TYPE: &'static str = "email";

    pub fn new(handle: impl Into<String>, settings: EmailSettings) -> Self {
        Self {
            handle: handle.into(),
            settings,
        }
    }

    pub fn from_settings(handle: String, settings: Value) -> Result<Box<dyn FormField>> {
        let settings: EmailSettings = serde_json::from_value(settings)?;
        Ok(Box::new(Self { handle, settings }))
    }
}

impl FormField for Email {
    fn type_name(&self) -> &'static str {
        Self::TYPE
    }

    fn display_name(&self) -> &'static str {
        "Email Address"
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
        if EMAIL.is_match(text.trim()) {
            Vec::new()
        } else {
            vec!["Please enter a valid email address.".to_string()]
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
                helpers::match_field(vec![Self::TYPE.to_string()]),
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
                    .attr("type", "email")
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
    fn accepts_plausible_addresses() {
        let field = Email::new("email", EmailSettings::default());
        assert!(field.validate(&json!("user@example.com")).is_empty());
        assert!(field.validate(&json!("a.b+tag@sub.example.co")).is_empty());
    }

    #[test]
    fn rejects_malformed_addresses() {
        let field = Email::new("email", EmailSettings::default());
        for bad in ["not-an-email", "user@", "@example.com", "a b@example.com", "user@host"] {
            assert_eq!(
                field.validate(&json!(bad)),
                vec!["Please enter a valid email address."],
                "expected rejection for {bad:?}"
            );
        }
    }

    #[test]
    fn null_value_skips_format_check() {
        let field = Email::new("email", EmailSettings::default());
        assert!(field.validate(&Value::Null).is_empty());
    }

    #[test]
    fn input_type_is_email() {
        let field = Email::new("email", EmailSettings::default());
        let tag = field
            .render_attributes("fieldInput", &RenderContext::new("f"))
            .unwrap();
        assert_eq!(tag.attributes["type"], json!("email"));
    }
}
