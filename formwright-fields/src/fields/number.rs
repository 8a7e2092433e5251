//! Numeric field. Normalizes to a JSON number and enforces an optional
//! inclusive range.

use formwright_common::error::{FormwrightError, Result};
use formwright_schema::{helpers, Condition, Control, FieldSchema, SchemaField};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Number, Value};

use crate::field::{BaseSettings, FormField, RenderContext, RenderTag};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct NumberSettings {
    #[serde(flatten)]
    pub base: BaseSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<f64>,
    /// Gate for the min/max bounds, mirroring the text limit toggle.
    pub limit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct NumberField {
    handle: String,
    settings: NumberSettings,
}

impl NumberField {
    pub const TYPE: &'static str = "number";

    pub fn new(handle: impl Into<String>, settings: NumberSettings) -> Self {
        Self {
            handle: handle.into(),
            settings,
        }
    }

    pub fn from_settings(handle: String, settings: Value) -> Result<Box<dyn FormField>> {
        let settings: NumberSettings = serde_json::from_value(settings)?;
        Ok(Box::new(Self { handle, settings }))
    }

    fn bounds(&self) -> (Option<f64>, Option<f64>) {
        if self.settings.limit {
            (self.settings.min, self.settings.max)
        } else {
            (None, None)
        }
    }
}

impl FormField for NumberField {
    fn type_name(&self) -> &'static str {
        Self::TYPE
    }

    fn display_name(&self) -> &'static str {
        "Number"
    }

    fn handle(&self) -> &str {
        &self.handle
    }

    fn base(&self) -> &BaseSettings {
        &self.settings.base
    }

    fn normalize(&self, raw: &Value) -> Result<Value> {
        match raw {
            Value::Null => Ok(Value::Null),
            Value::Number(_) => Ok(raw.clone()),
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(Value::Null);
                }
                let parsed: f64 = trimmed.parse().map_err(|_| FormwrightError::TypeMismatch {
                    handle: self.handle.clone(),
                    expected: "number",
                    actual: FormwrightError::value_shape(raw),
                })?;
                Number::from_f64(parsed)
                    .map(Value::Number)
                    .ok_or_else(|| FormwrightError::TypeMismatch {
                        handle: self.handle.clone(),
                        expected: "number",
                        actual: FormwrightError::value_shape(raw),
                    })
            }
            other => Err(FormwrightError::TypeMismatch {
                handle: self.handle.clone(),
                expected: "number",
                actual: FormwrightError::value_shape(other),
            }),
        }
    }

    fn serialize_value(&self, normalized: &Value) -> Result<Value> {
        // Stored form is already the normalized number.
        Ok(normalized.clone())
    }

    fn validate(&self, normalized: &Value) -> Vec<String> {
        let Some(n) = normalized.as_f64() else {
            return Vec::new();
        };
        let (min, max) = self.bounds();
        let mut errors = Vec::new();
        if let Some(min) = min {
            if n < min {
                errors.push(format!("The value must be no less than {min}."));
            }
        }
        if let Some(max) = max {
            if n > max {
                errors.push(format!("The value must be no greater than {max}."));
            }
        }
        errors
    }

    fn schema(&self) -> FieldSchema {
        FieldSchema::new()
            .general(vec![
                helpers::label_field(),
                helpers::placeholder_field(),
                SchemaField::new(Control::Number)
                    .name("defaultValue")
                    .label("Default Value"),
            ])
            .settings(vec![
                helpers::required_field(),
                helpers::error_message_field(),
                SchemaField::new(Control::Lightswitch)
                    .name("limit")
                    .label("Limit Value")
                    .help("Whether to restrict the value to a range."),
                SchemaField::new(Control::Row).when(Condition::truthy("limit")).children(vec![
                    SchemaField::new(Control::Column).children(vec![SchemaField::new(
                        Control::Number,
                    )
                    .name("min")
                    .label("Min Value")]),
                    SchemaField::new(Control::Column).children(vec![SchemaField::new(
                        Control::Number,
                    )
                    .name("max")
                    .label("Max Value")]),
                ]),
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
                let (min, max) = self.bounds();
                let id = self.html_id(ctx);
                let classes = if ctx.errors {
                    json!(["fui-input", "fui-error"])
                } else {
                    json!(["fui-input"])
                };
                let mut tag = RenderTag::new("input")
                    .attr("type", "number")
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
                    .attr("min", min.map(Value::from).unwrap_or(Value::Null))
                    .attr("max", max.map(Value::from).unwrap_or(Value::Null))
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

    fn ranged(min: Option<f64>, max: Option<f64>) -> NumberField {
        NumberField::new(
            "quantity",
            NumberSettings {
                limit: true,
                min,
                max,
                ..Default::default()
            },
        )
    }

    #[test]
    fn string_input_parses_to_number() {
        let field = NumberField::new("quantity", NumberSettings::default());
        assert_eq!(field.normalize(&json!("42")).unwrap(), json!(42.0));
        assert_eq!(field.normalize(&json!(" 3.5 ")).unwrap(), json!(3.5));
    }

    #[test]
    fn unparseable_string_is_a_type_mismatch() {
        let field = NumberField::new("quantity", NumberSettings::default());
        let err = field.normalize(&json!("forty-two")).unwrap_err();
        assert!(err.to_string().contains("quantity"));
    }

    #[test]
    fn empty_string_normalizes_to_null() {
        let field = NumberField::new("quantity", NumberSettings::default());
        assert_eq!(field.normalize(&json!("")).unwrap(), Value::Null);
    }

    #[test]
    fn range_enforced_inclusively() {
        let field = ranged(Some(1.0), Some(10.0));
        assert!(field.validate(&json!(1.0)).is_empty());
        assert!(field.validate(&json!(10.0)).is_empty());
        assert_eq!(
            field.validate(&json!(0.5)),
            vec!["The value must be no less than 1."]
        );
        assert_eq!(
            field.validate(&json!(11)),
            vec!["The value must be no greater than 10."]
        );
    }

    #[test]
    fn bounds_ignored_when_limit_disabled() {
        let field = NumberField::new(
            "quantity",
            NumberSettings {
                limit: false,
                min: Some(5.0),
                ..Default::default()
            },
        );
        assert!(field.validate(&json!(1)).is_empty());
    }
}
