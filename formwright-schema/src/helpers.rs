//! Ready-made schema entries shared by most field types.
//!
//! Field types compose their schemas from these instead of repeating the
//! same label/handle/required entries everywhere.

use crate::condition::Condition;
use crate::types::{ConstraintSet, Control, SchemaField, SelectOption};

/// The field's display label.
pub fn label_field() -> SchemaField {
    SchemaField::new(Control::Text)
        .name("label")
        .label("Label")
        .help("The label that describes this field.")
        .required(true)
}

/// Placeholder text shown when the field has no value.
pub fn placeholder_field() -> SchemaField {
    SchemaField::new(Control::Text)
        .name("placeholder")
        .label("Placeholder")
        .help("The text that will be shown if the field doesn't have a value.")
}

/// Default value, with catalog variables insertable.
pub fn default_value_field() -> SchemaField {
    SchemaField::new(Control::VariableText {
        variables: "userVariables".into(),
    })
    .name("defaultValue")
    .label("Default Value")
    .help("Set a default value for the field when it doesn't have a value.")
}

/// Required toggle.
pub fn required_field() -> SchemaField {
    SchemaField::new(Control::Lightswitch)
        .name("required")
        .label("Required Field")
        .help("Whether this field should be required when filling out the form.")
}

/// Custom error message, visible only when the field is required.
pub fn error_message_field() -> SchemaField {
    SchemaField::new(Control::Text)
        .name("errorMessage")
        .label("Error Message")
        .help("When validating the form, show this message if an error occurs. Leave empty to retain the default message.")
        .when(Condition::truthy("required"))
}

/// Limit toggle gating all min/max threshold checks.
pub fn limit_field() -> SchemaField {
    SchemaField::new(Control::Lightswitch)
        .name("limit")
        .label("Limit Value")
        .help("Whether to limit the value of this field.")
}

fn limit_type_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new("characters", "Characters"),
        SelectOption::new("words", "Words"),
    ]
}

fn limit_bound(bound: &str, label: &str, help: &str) -> SchemaField {
    SchemaField::new(Control::Column)
        .label(label)
        .help(help)
        .children(vec![
            SchemaField::new(Control::Number)
                .name(bound)
                .constraints(ConstraintSet::new().integer_only().with_range(Some(0.0), None)),
            SchemaField::new(Control::Select {
                options: limit_type_options(),
            })
            .name(format!("{bound}Type"))
            .constraints(
                ConstraintSet::new().with_allowed(vec!["characters".into(), "words".into()]),
            ),
        ])
}

/// Min/max threshold row, visible only when `limit` is on.
pub fn limit_bounds_row() -> SchemaField {
    SchemaField::new(Control::Row)
        .when(Condition::truthy("limit"))
        .children(vec![
            limit_bound(
                "min",
                "Min Value",
                "Set a minimum value that users must enter.",
            ),
            limit_bound(
                "max",
                "Max Value",
                "Set a maximum value that users must enter.",
            ),
        ])
}

/// Declares value-sync eligibility with other instances of the given
/// field types (confirmation-field pairing). The builder performs the
/// sync.
pub fn match_field(field_types: Vec<String>) -> SchemaField {
    SchemaField::new(Control::MatchField { field_types })
        .name("matchField")
        .label("Match Field")
        .help("Have this field's value match another field's value.")
}

/// The field's machine-readable handle.
pub fn handle_field() -> SchemaField {
    SchemaField::new(Control::Handle)
        .name("handle")
        .label("Handle")
        .help("How you'll refer to this field in your templates.")
        .required(true)
}

/// Extra CSS classes for the rendered input.
pub fn css_classes_field() -> SchemaField {
    SchemaField::new(Control::Text)
        .name("cssClasses")
        .label("CSS Classes")
        .help("Add classes to be outputted on this field's container.")
}

/// Instructional text shown alongside the field.
pub fn instructions_field() -> SchemaField {
    SchemaField::new(Control::Textarea)
        .name("instructions")
        .label("Instructions")
        .help("Acts as help text for users filling out the form.")
}

/// Visibility select (visible, hidden, disabled).
pub fn visibility_field() -> SchemaField {
    SchemaField::new(Control::Select {
        options: vec![
            SelectOption::new("visible", "Visible"),
            SelectOption::new("hidden", "Hidden"),
            SelectOption::new("disabled", "Disabled"),
        ],
    })
    .name("visibility")
    .label("Visibility")
    .constraints(ConstraintSet::new().with_allowed(vec![
        "visible".into(),
        "hidden".into(),
        "disabled".into(),
    ]))
}

/// Label position select.
pub fn label_position_field() -> SchemaField {
    SchemaField::new(Control::Select {
        options: vec![
            SelectOption::new("above", "Above"),
            SelectOption::new("below", "Below"),
            SelectOption::new("hidden", "Hidden"),
        ],
    })
    .name("labelPosition")
    .label("Label Position")
}

/// Conditions toggle.
pub fn enable_conditions_field() -> SchemaField {
    SchemaField::new(Control::Lightswitch)
        .name("enableConditions")
        .label("Enable Conditions")
        .help("Whether to enable conditional logic to show or hide this field.")
}

/// Condition rules editor, visible only when conditions are enabled.
pub fn conditions_field() -> SchemaField {
    SchemaField::new(Control::Textarea)
        .name("conditions")
        .label("Conditions")
        .when(Condition::truthy("enableConditions"))
}

/// Option rows editor for choice fields.
pub fn options_table() -> SchemaField {
    SchemaField::new(Control::Table {
        columns: vec!["label".into(), "value".into()],
    })
    .name("options")
    .label("Options")
    .help("Define the available options for users to select from.")
    .required(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_message_visible_only_when_required() {
        let entry = error_message_field();
        let cond = entry.condition.unwrap();

        let mut values = serde_json::Map::new();
        assert!(!cond.evaluate(&values));
        values.insert("required".into(), json!(true));
        assert!(cond.evaluate(&values));
    }

    #[test]
    fn limit_bounds_hidden_until_limit_on() {
        let row = limit_bounds_row();
        let cond = row.condition.unwrap();

        let mut values = serde_json::Map::new();
        values.insert("limit".into(), json!(false));
        assert!(!cond.evaluate(&values));
        values.insert("limit".into(), json!(true));
        assert!(cond.evaluate(&values));
    }

    #[test]
    fn limit_bounds_declare_both_units() {
        let row = limit_bounds_row();
        assert_eq!(row.children.len(), 2);
        let min_col = &row.children[0];
        let names: Vec<_> = min_col
            .children
            .iter()
            .filter_map(|c| c.name.as_deref())
            .collect();
        assert_eq!(names, vec!["min", "minType"]);

        let min_type = &min_col.children[1];
        let allowed = min_type
            .constraints
            .as_ref()
            .unwrap()
            .allowed
            .as_ref()
            .unwrap();
        assert_eq!(allowed, &["characters", "words"]);
    }

    #[test]
    fn match_field_declares_eligibility_only() {
        let entry = match_field(vec!["single-line-text".into()]);
        match entry.control {
            Control::MatchField { field_types } => {
                assert_eq!(field_types, vec!["single-line-text"]);
            }
            _ => panic!("expected MatchField control"),
        }
    }
}
