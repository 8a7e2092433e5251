//! Form definition model and the builder wire payload.
//!
//! The builder UI round-trips `{ settings, pages: [...], notifications:
//! [...] }`; pages nest rows of field configurations keyed by `type` and
//! `handle`. The persisted [`FormDefinition`] mirrors that tree with a
//! stable id.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ulid::Ulid;

/// Form-level settings carried alongside the field tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FormSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit_action_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub display_form_title: bool,
    pub display_page_tabs: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_status: Option<String>,
}

/// One configured field in the tree, keyed by type discriminator and
/// handle. `settings` is the raw configuration map; the registry decodes
/// it into the concrete type's settings struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    #[serde(rename = "type")]
    pub type_name: String,
    pub handle: String,
    #[serde(default)]
    pub settings: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RowConfig {
    pub fields: Vec<FieldConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PageConfig {
    pub label: String,
    pub rows: Vec<RowConfig>,
}

/// A configured notification; opaque to the field pipeline, carried
/// separately on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationConfig {
    pub name: String,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipients: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

/// The edited configuration tree the builder UI posts back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FormPayload {
    pub settings: FormSettings,
    pub pages: Vec<PageConfig>,
    pub notifications: Vec<NotificationConfig>,
}

/// The persisted form: identity plus the decoded payload tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinition {
    pub id: Ulid,
    pub handle: String,
    pub title: String,
    pub settings: FormSettings,
    pub pages: Vec<PageConfig>,
    pub notifications: Vec<NotificationConfig>,
}

impl FormDefinition {
    pub fn new(handle: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Ulid::new(),
            handle: handle.into(),
            title: title.into(),
            settings: FormSettings::default(),
            pages: Vec::new(),
            notifications: Vec::new(),
        }
    }

    /// All field configurations in tree order (page, then row, then
    /// field insertion order).
    pub fn fields(&self) -> impl Iterator<Item = &FieldConfig> {
        self.pages
            .iter()
            .flat_map(|page| page.rows.iter())
            .flat_map(|row| row.fields.iter())
    }

    pub fn field_handles(&self) -> Vec<String> {
        self.fields().map(|f| f.handle.clone()).collect()
    }
}
