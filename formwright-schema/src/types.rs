//! Schema entry types for field configuration surfaces.
//!
//! All types serialize to/from JSON via serde; the builder UI consumes
//! them as-is. A field type's schema is a fixed, ordered sequence of
//! entries partitioned into five groups.

use crate::condition::Condition;
use serde::{Deserialize, Serialize};

/// A single option in a select control.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectOption {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: Some(label.into()),
        }
    }
}

/// The kind of control an entry renders, which determines the value shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Control {
    Text,
    Textarea,
    Lightswitch,
    Number,
    Select {
        options: Vec<SelectOption>,
    },
    /// Text input with insertable catalog variables.
    VariableText {
        variables: String,
    },
    /// Declares that this field's value may be synced with another
    /// instance of an eligible field type. The builder performs the sync;
    /// the schema only declares eligibility.
    MatchField {
        #[serde(rename = "fieldTypes")]
        field_types: Vec<String>,
    },
    /// Handle input with reserved-word and format checking.
    Handle,
    /// Key/value rows, used for editing select options.
    Table {
        columns: Vec<String>,
    },
    /// Horizontal layout container; children are the real entries.
    Row,
    /// Column inside a row.
    Column,
}

/// Constraints declared once in the schema and enforced both in the
/// builder (to guard input) and again server-side at save time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintSet {
    /// Value must be an integer
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub integer_only: bool,

    /// Minimum numeric value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    /// Maximum numeric value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Enumerated range: value must be one of these
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn integer_only(mut self) -> Self {
        self.integer_only = true;
        self
    }

    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_allowed(mut self, allowed: Vec<String>) -> Self {
        self.allowed = Some(allowed);
        self
    }
}

/// One configurable property of a field type: a control, its constraints,
/// and a visibility predicate over sibling values. Layout containers have
/// no name and carry children instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    pub control: Control,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<ConstraintSet>,

    /// Visibility predicate; absent means always visible.
    #[serde(rename = "if", default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SchemaField>,
}

impl SchemaField {
    pub fn new(control: Control) -> Self {
        Self {
            name: None,
            label: None,
            help: None,
            control,
            required: false,
            constraints: None,
            condition: None,
            children: Vec::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn constraints(mut self, constraints: ConstraintSet) -> Self {
        self.constraints = Some(constraints);
        self
    }

    /// Show this entry only when the condition holds.
    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn children(mut self, children: Vec<SchemaField>) -> Self {
        self.children = children;
        self
    }
}

/// The five fixed schema groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SchemaGroup {
    General,
    Settings,
    Appearance,
    Advanced,
    Conditions,
}

impl SchemaGroup {
    /// All groups in display order.
    pub const ALL: [SchemaGroup; 5] = [
        SchemaGroup::General,
        SchemaGroup::Settings,
        SchemaGroup::Appearance,
        SchemaGroup::Advanced,
        SchemaGroup::Conditions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaGroup::General => "general",
            SchemaGroup::Settings => "settings",
            SchemaGroup::Appearance => "appearance",
            SchemaGroup::Advanced => "advanced",
            SchemaGroup::Conditions => "conditions",
        }
    }
}

/// A field type's full configuration surface. An empty group means "no
/// configurable properties in that category", not an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub general: Vec<SchemaField>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub settings: Vec<SchemaField>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub appearance: Vec<SchemaField>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advanced: Vec<SchemaField>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<SchemaField>,
}

impl FieldSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn general(mut self, entries: Vec<SchemaField>) -> Self {
        self.general = entries;
        self
    }

    pub fn settings(mut self, entries: Vec<SchemaField>) -> Self {
        self.settings = entries;
        self
    }

    pub fn appearance(mut self, entries: Vec<SchemaField>) -> Self {
        self.appearance = entries;
        self
    }

    pub fn advanced(mut self, entries: Vec<SchemaField>) -> Self {
        self.advanced = entries;
        self
    }

    pub fn conditions(mut self, entries: Vec<SchemaField>) -> Self {
        self.conditions = entries;
        self
    }

    /// Entries in one group.
    pub fn group(&self, group: SchemaGroup) -> &[SchemaField] {
        match group {
            SchemaGroup::General => &self.general,
            SchemaGroup::Settings => &self.settings,
            SchemaGroup::Appearance => &self.appearance,
            SchemaGroup::Advanced => &self.advanced,
            SchemaGroup::Conditions => &self.conditions,
        }
    }

    /// Every entry in every group, depth-first through layout containers.
    pub fn walk(&self) -> Vec<&SchemaField> {
        fn visit<'a>(entries: &'a [SchemaField], out: &mut Vec<&'a SchemaField>) {
            for entry in entries {
                out.push(entry);
                visit(&entry.children, out);
            }
        }
        let mut out = Vec::new();
        for group in SchemaGroup::ALL {
            visit(self.group(group), &mut out);
        }
        out
    }
}
