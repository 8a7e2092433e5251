//! Single-line text field.
//!
//! The reference implementation of the text contract: entity-aware
//! normalization/serialization, the full limit rule set, and a live
//! character-limit counter element when a maximum is configured.

use formwright_common::error::Result;
use formwright_schema::{helpers, FieldSchema};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::field::{
    normalize_text, serialize_text, BaseSettings, FormField, RenderContext, RenderTag,
};
use crate::rules::{LimitSettings, ValidationRule};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SingleLineTextSettings {
    #[serde(flatten)]
    pub base: BaseSettings,
    #[serde(flatten)]
    pub limit: LimitSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SingleLineText {
    handle: String,
    settings: SingleLineTextSettings,
}

impl SingleLineText {
    pub const TYPE: &'static str = "single-line-text";

    pub fn new(handle: impl Into<String>, settings: SingleLineTextSettings) -> Self {
        Self {
            handle: handle.into(),
            settings,
        }
    }

    /// Registry factory: decode settings from the wire payload.
    pub fn from_settings(handle: String, settings: Value) -> Result<Box<dyn FormField>> {
        let settings: SingleLineTextSettings = serde_json::from_value(settings)?;
        Ok(Box::new(Self { handle, settings }))
    }

    pub fn settings(&self) -> &SingleLineTextSettings {
        &self.settings
    }
}

impl FormField for SingleLineText {
    fn type_name(&self) -> &'static str {
        Self::TYPE
    }

    fn display_name(&self) -> &'static str {
        "Single-line Text"
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

    fn validation_rules(&self) -> Vec<ValidationRule> {
        self.settings.limit.rules()
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
                helpers::limit_field(),
                helpers::limit_bounds_row(),
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
        let limit = &self.settings.limit;

        match key {
            "fieldInput" => {
                let id = self.html_id(ctx);
                let classes = if ctx.errors {
                    json!(["fui-input", "fui-error"])
                } else {
                    json!(["fui-input"])
                };
                let mut tag = RenderTag::new("input")
                    .attr("type", "text")
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
                // Effective thresholds mirrored for the client counter.
                for (attr, value) in [
                    ("data-min-chars", limit.min_chars()),
                    ("data-max-chars", limit.max_chars()),
                    ("data-min-words", limit.min_words()),
                    ("data-max-words", limit.max_words()),
                ] {
                    if let Some(v) = value {
                        tag = tag.attr(attr, v);
                    }
                }
                if base.instructions.is_some() {
                    tag = tag.attr("aria-describedby", format!("{id}-instructions"));
                }
                Some(tag)
            }
            "fieldLimit" => {
                // Live counter element; only meaningful with a max bound.
                if limit.limit && limit.max.is_some() {
                    Some(
                        RenderTag::new("div")
                            .attr("class", "fui-limit-text")
                            .attr("data-limit", true),
                    )
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}
