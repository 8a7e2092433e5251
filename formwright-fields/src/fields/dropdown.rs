//! Dropdown field. Single choice from a configured option list; the
//! submitted value must match one of the option values.

use formwright_common::error::Result;
use formwright_schema::{helpers, FieldSchema};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::field::{
    normalize_text, serialize_text, value_as_text, BaseSettings, FormField, RenderContext,
    RenderTag,
};
use crate::fields::FieldOption;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DropdownSettings {
    #[serde(flatten)]
    pub base: BaseSettings,
    pub options: Vec<FieldOption>,
}

#[derive(Debug, Clone)]
pub struct Dropdown {
    handle: String,
    settings: DropdownSettings,
}

impl Dropdown {
    pub const TYPE: &'static str = "dropdown";

    pub fn new(handle: impl Into<String>, settings: DropdownSettings) -> Self {
        Self {
            handle: handle.into(),
            settings,
        }
    }

    pub fn from_settings(handle: String, settings: Value) -> Result<Box<dyn FormField>> {
        let settings: DropdownSettings = serde_json::from_value(settings)?;
        Ok(Box::new(Self { handle, settings }))
    }

    fn is_known_option(&self, value: &str) -> bool {
        self.settings.options.iter().any(|o| o.value == value)
    }
}

impl FormField for Dropdown {
    fn type_name(&self) -> &'static str {
        Self::TYPE
    }

    fn display_name(&self) -> &'static str {
        "Dropdown"
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
        if self.is_known_option(&text) {
            Vec::new()
        } else {
            vec!["Please select a valid option.".to_string()]
        }
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
            "fieldInput" => {
                let classes = if ctx.errors {
                    json!(["fui-select", "fui-error"])
                } else {
                    json!(["fui-select"])
                };
                let mut tag = RenderTag::new("select")
                    .attr("id", self.html_id(ctx))
                    .attr("class", classes)
                    .attr("name", self.handle.clone())
                    .attr("data-fui-id", self.html_data_id(ctx))
                    .attr(
                        "data-fui-message",
                        base.error_message.clone().map(Value::from).unwrap_or(Value::Null),
                    );
                if base.required {
                    tag = tag.attr("required", true);
                }
                Some(tag)
            }
            _ => None,
        }
    }
}
