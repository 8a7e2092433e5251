//! Server-side structural validation of configured values against the
//! declared constraints.
//!
//! The builder enforces the same constraints to guard input, but client
//! evaluation is never trusted alone; every save re-checks here.

use crate::types::{FieldSchema, SchemaField};
use serde_json::{Map, Value};
use tracing::debug;

/// One structural problem found in a configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsIssue {
    /// The schema entry name the issue applies to
    pub name: String,
    /// Human-facing message
    pub message: String,
}

/// Check configured values against every visible entry's constraints.
/// Accumulates all issues rather than stopping at the first.
pub fn validate_settings(schema: &FieldSchema, values: &Map<String, Value>) -> Vec<SettingsIssue> {
    let mut issues = Vec::new();
    for entry in schema.walk() {
        check_entry(entry, values, &mut issues);
    }
    if !issues.is_empty() {
        debug!(count = issues.len(), "settings failed structural validation");
    }
    issues
}

fn check_entry(entry: &SchemaField, values: &Map<String, Value>, issues: &mut Vec<SettingsIssue>) {
    // Hidden entries are not validated; their values are inert.
    if let Some(cond) = &entry.condition {
        if !cond.evaluate(values) {
            return;
        }
    }

    let Some(name) = &entry.name else {
        return;
    };
    let value = values.get(name).unwrap_or(&Value::Null);

    // Required means present and non-blank; "" fails the same as null.
    let blank = value.is_null() || value.as_str().is_some_and(str::is_empty);
    if entry.required && blank {
        issues.push(SettingsIssue {
            name: name.clone(),
            message: format!("{name} cannot be blank."),
        });
        return;
    }

    if value.is_null() {
        return;
    }

    let Some(constraints) = &entry.constraints else {
        return;
    };

    if constraints.integer_only {
        let is_integer = value
            .as_f64()
            .is_some_and(|f| f.fract() == 0.0);
        if !is_integer {
            issues.push(SettingsIssue {
                name: name.clone(),
                message: format!("{name} must be an integer."),
            });
            return;
        }
    }

    if let Some(num) = value.as_f64() {
        if let Some(min) = constraints.min {
            if num < min {
                issues.push(SettingsIssue {
                    name: name.clone(),
                    message: format!("{name} must be no less than {min}."),
                });
            }
        }
        if let Some(max) = constraints.max {
            if num > max {
                issues.push(SettingsIssue {
                    name: name.clone(),
                    message: format!("{name} must be no greater than {max}."),
                });
            }
        }
    }

    if let Some(allowed) = &constraints.allowed {
        let as_string = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if !allowed.contains(&as_string) {
            issues.push(SettingsIssue {
                name: name.clone(),
                message: format!("{name} must be one of: {}.", allowed.join(", ")),
            });
        }
    }
}
