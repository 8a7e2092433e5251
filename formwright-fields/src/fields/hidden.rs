//! Hidden field. Carries a preset value through the form without any
//! visible control; minimal configuration surface.

use formwright_common::error::Result;
use formwright_schema::{helpers, FieldSchema};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::field::{
    normalize_text, serialize_text, BaseSettings, FormField, RenderContext, RenderTag,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct HiddenSettings {
    #[serde(flatten)]
    pub base: BaseSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Hidden {
    handle: String,
    settings: HiddenSettings,
}

impl Hidden {
    pub const TYPE: &'static str = "hidden";

    pub fn new(handle: impl Into<String>, settings: HiddenSettings) -> Self {
        Self {
            handle: handle.into(),
            settings,
        }
    }

    pub fn from_settings(handle: String, settings: Value) -> Result<Box<dyn FormField>> {
        let settings: HiddenSettings = serde_json::from_value(settings)?;
        Ok(Box::new(Self { handle, settings }))
    }
}

impl FormField for Hidden {
    fn type_name(&self) -> &'static str {
        Self::TYPE
    }

    fn display_name(&self) -> &'static str {
        "Hidden"
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

    fn schema(&self) -> FieldSchema {
        FieldSchema::new()
            .general(vec![helpers::label_field(), helpers::default_value_field()])
            .advanced(vec![helpers::handle_field()])
    }

    fn settings_values(&self) -> Map<String, Value> {
        serde_json::to_value(&self.settings)
            .ok()
            .and_then(|v| v.as_object().cloned())
            .unwrap_or_default()
    }

    fn render_attributes(&self, key: &str, ctx: &RenderContext) -> Option<RenderTag> {
        match key {
            "fieldInput" => Some(
                RenderTag::new("input")
                    .attr("type", "hidden")
                    .attr("id", self.html_id(ctx))
                    .attr("name", self.handle.clone())
                    .attr(
                        "value",
                        self.settings
                            .default_value
                            .clone()
                            .map(Value::from)
                            .unwrap_or(Value::Null),
                    )
                    .attr("data-fui-id", self.html_data_id(ctx)),
            ),
            _ => None,
        }
    }
}
