//! Submission pipeline.
//!
//! Accepts raw posted values keyed by field handle and runs the
//! per-field normalize, validate, serialize pipeline. Failures
//! accumulate per field rather than short-circuiting, so one pass
//! yields the complete error map.

use formwright_common::error::{FormwrightError, Result};
use formwright_common::Pretty;
use formwright_fields::field::FormField;
use formwright_fields::registry::FieldRegistry;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use crate::form::FormDefinition;

const REQUIRED_MESSAGE: &str = "This field is required.";

/// Outcome of one submission pass: either serialized values ready for
/// persistence, or per-field error lists.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Accepted { values: Map<String, Value> },
    Rejected { errors: IndexMap<String, Vec<String>> },
}

impl SubmissionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionOutcome::Accepted { .. })
    }

    pub fn errors(&self) -> Option<&IndexMap<String, Vec<String>>> {
        match self {
            SubmissionOutcome::Rejected { errors } => Some(errors),
            SubmissionOutcome::Accepted { .. } => None,
        }
    }
}

/// Run a submission against a stored form definition.
///
/// Fields are instantiated from the form's configuration tree; a
/// configuration that no longer decodes is an error (the form needs
/// re-saving), not a submission failure.
pub fn submit(
    registry: &FieldRegistry,
    form: &FormDefinition,
    posted: &Map<String, Value>,
) -> Result<SubmissionOutcome> {
    let mut fields: Vec<Box<dyn FormField>> = Vec::new();
    for config in form.fields() {
        fields.push(registry.create(
            &config.type_name,
            config.handle.clone(),
            config.settings.clone(),
        )?);
    }
    Ok(run_pipeline(&fields, posted))
}

/// The pipeline proper, usable with any field set.
pub fn run_pipeline(
    fields: &[Box<dyn FormField>],
    posted: &Map<String, Value>,
) -> SubmissionOutcome {
    let mut values = Map::new();
    let mut errors: IndexMap<String, Vec<String>> = IndexMap::new();

    for field in fields {
        let handle = field.handle().to_string();
        let raw = posted.get(&handle).cloned().unwrap_or(Value::Null);

        let normalized = match field.normalize(&raw) {
            Ok(v) => v,
            Err(err) => {
                // Malformed shape is a field error, not a pipeline
                // failure; the remaining fields still get checked.
                let message = match &err {
                    FormwrightError::TypeMismatch { expected, .. } => {
                        format!("Expected a {expected} value.")
                    }
                    other => other.to_string(),
                };
                errors.entry(handle).or_default().push(message);
                continue;
            }
        };

        let mut field_errors = Vec::new();
        if field.base().required && normalized.is_null() {
            let message = field
                .base()
                .error_message
                .clone()
                .unwrap_or_else(|| REQUIRED_MESSAGE.to_string());
            field_errors.push(message);
        }
        field_errors.extend(field.validate(&normalized));

        if field_errors.is_empty() {
            match field.serialize_value(&normalized) {
                Ok(stored) => {
                    values.insert(handle, stored);
                }
                Err(err) => {
                    errors.entry(handle).or_default().push(err.to_string());
                }
            }
        } else {
            errors.entry(handle).or_default().extend(field_errors);
        }
    }

    if errors.is_empty() {
        SubmissionOutcome::Accepted { values }
    } else {
        debug!(fields = errors.len(), "submission rejected: {}", Pretty(&errors));
        SubmissionOutcome::Rejected { errors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FormBuilderEngine;
    use crate::form::FormPayload;
    use serde_json::json;

    fn contact_form() -> (FormBuilderEngine, FormDefinition) {
        let engine = FormBuilderEngine::default();
        let mut form = FormDefinition::new("contact", "Contact");
        let payload: FormPayload = serde_json::from_value(json!({
            "pages": [{
                "label": "Page 1",
                "rows": [{
                    "fields": [
                        {"type": "single-line-text", "handle": "name",
                         "settings": {"label": "Name", "required": true}},
                        {"type": "email", "handle": "email",
                         "settings": {"label": "Email", "required": true,
                                      "errorMessage": "We need your email."}},
                        {"type": "single-line-text", "handle": "summary",
                         "settings": {"label": "Summary", "limit": true,
                                      "max": 3, "maxType": "words"}}
                    ]
                }]
            }]
        }))
        .unwrap();
        engine.apply_payload(&mut form, payload).unwrap();
        (engine, form)
    }

    #[test]
    fn valid_submission_is_accepted_with_serialized_values() {
        let (engine, form) = contact_form();
        let posted: Map<String, Value> = serde_json::from_value(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "summary": "short and sweet"
        }))
        .unwrap();
        let outcome = submit(engine.registry(), &form, &posted).unwrap();
        let SubmissionOutcome::Accepted { values } = outcome else {
            panic!("expected acceptance");
        };
        assert_eq!(values["name"], json!("Ada"));
        assert_eq!(values["email"], json!("ada@example.com"));
    }

    #[test]
    fn errors_accumulate_across_all_fields() {
        let (engine, form) = contact_form();
        let posted: Map<String, Value> = serde_json::from_value(json!({
            "email": "not-an-email",
            "summary": "way too many words here"
        }))
        .unwrap();
        let outcome = submit(engine.registry(), &form, &posted).unwrap();
        let errors = outcome.errors().unwrap();
        assert_eq!(errors["name"], vec!["This field is required."]);
        assert_eq!(errors["email"], vec!["Please enter a valid email address."]);
        assert_eq!(errors["summary"], vec!["Limited to 3 words."]);
    }

    #[test]
    fn custom_error_message_replaces_required_default() {
        let (engine, form) = contact_form();
        let posted: Map<String, Value> = serde_json::from_value(json!({
            "name": "Ada"
        }))
        .unwrap();
        let outcome = submit(engine.registry(), &form, &posted).unwrap();
        let errors = outcome.errors().unwrap();
        assert_eq!(errors["email"], vec!["We need your email."]);
    }

    #[test]
    fn type_mismatch_is_recorded_not_propagated() {
        let (engine, form) = contact_form();
        let posted: Map<String, Value> = serde_json::from_value(json!({
            "name": {"nested": true},
            "email": "ada@example.com"
        }))
        .unwrap();
        let outcome = submit(engine.registry(), &form, &posted).unwrap();
        let errors = outcome.errors().unwrap();
        assert_eq!(errors["name"], vec!["Expected a string value."]);
        assert!(!errors.contains_key("email"));
    }

    #[test]
    fn entities_are_encoded_in_stored_values() {
        let (engine, form) = contact_form();
        let posted: Map<String, Value> = serde_json::from_value(json!({
            "name": "Zoë 🔥",
            "email": "zoe@example.com"
        }))
        .unwrap();
        let outcome = submit(engine.registry(), &form, &posted).unwrap();
        let SubmissionOutcome::Accepted { values } = outcome else {
            panic!("expected acceptance");
        };
        assert_eq!(values["name"], json!("Zo&#xEB; &#x1F525;"));
    }
}
