//! Builder config assembly.
//!
//! The engine is constructed once at process start and threaded through
//! request-scoped calls; it owns the field registry and the static
//! catalog data (statuses, templates, variables). Assembly produces the
//! single payload the builder UI and submission pipeline consume.

use formwright_common::error::{FormwrightError, Result};
use formwright_common::handles::{
    unique_handle, validate_handle, HandleIssue, MAX_FIELD_HANDLE_LENGTH,
    MAX_FORM_HANDLE_LENGTH, RESERVED_HANDLES,
};
use formwright_fields::registry::{FieldRegistry, FieldTypeInfo};
use formwright_schema::{validate_settings, FieldSchema};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use ulid::Ulid;

use crate::form::{FieldConfig, FormDefinition, FormPayload, PageConfig, RowConfig};
use crate::store::FormStore;

/// Operations on forms, each mapped to the capability name an external
/// permission collaborator must grant. Authorization itself is decided
/// outside the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormOperation {
    View,
    Create,
    Edit,
    Delete,
}

impl FormOperation {
    pub fn capability(&self) -> &'static str {
        match self {
            FormOperation::View => "forms:view",
            FormOperation::Create => "forms:create",
            FormOperation::Edit => "forms:edit",
            FormOperation::Delete => "forms:delete",
        }
    }

    /// Check this operation against a granted capability list.
    pub fn require(&self, granted: &[String]) -> Result<()> {
        let capability = self.capability();
        if granted.iter().any(|g| g == capability) {
            Ok(())
        } else {
            Err(FormwrightError::PermissionDenied {
                capability: capability.to_string(),
            })
        }
    }
}

/// A submission status a form can assign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormStatus {
    pub handle: String,
    pub label: String,
    pub color: String,
    pub is_default: bool,
}

/// A named form template available when creating forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    pub handle: String,
    pub label: String,
}

/// One entry of the variable catalog offered in notification editors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableInfo {
    pub label: String,
    pub value: String,
}

/// Catalog data read-consistent at assembly time. Not guaranteed fresh
/// afterwards; callers re-fetch before subsequent edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    pub field_types: Vec<FieldTypeInfo>,
    pub reserved_handles: Vec<String>,
    pub form_handles: Vec<String>,
    pub max_form_handle_length: usize,
    pub max_field_handle_length: usize,
    pub statuses: Vec<FormStatus>,
    pub templates: Vec<TemplateInfo>,
    pub variables: Vec<VariableInfo>,
}

/// One field node of the assembled config: resolved schema plus current
/// configuration values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigField {
    #[serde(rename = "type")]
    pub type_name: String,
    pub handle: String,
    pub label: String,
    pub settings: Map<String, Value>,
    pub schema: FieldSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRow {
    pub fields: Vec<ConfigField>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPage {
    pub label: String,
    pub rows: Vec<ConfigRow>,
}

/// The full builder payload: form identity, field tree with schemas,
/// and the catalog snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderConfig {
    pub form_id: Ulid,
    pub form_handle: String,
    pub title: String,
    pub pages: Vec<ConfigPage>,
    pub catalog: CatalogSnapshot,
}

pub struct FormBuilderEngine {
    registry: FieldRegistry,
    statuses: Vec<FormStatus>,
    templates: Vec<TemplateInfo>,
    variables: Vec<VariableInfo>,
}

impl FormBuilderEngine {
    pub fn new(registry: FieldRegistry) -> Self {
        Self {
            registry,
            statuses: default_statuses(),
            templates: Vec::new(),
            variables: default_variables(),
        }
    }

    pub fn with_templates(mut self, templates: Vec<TemplateInfo>) -> Self {
        self.templates = templates;
        self
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Assemble the builder config for a stored form.
    ///
    /// A missing form fails with `NotFound` before anything is built, so
    /// callers never observe a partial payload.
    pub fn builder_config(&self, store: &dyn FormStore, id: Ulid) -> Result<BuilderConfig> {
        let form = store.load_form(id)?;
        let mut pages = Vec::with_capacity(form.pages.len());
        for page in &form.pages {
            let mut rows = Vec::with_capacity(page.rows.len());
            for row in &page.rows {
                let mut fields = Vec::with_capacity(row.fields.len());
                for config in &row.fields {
                    let field = self.registry.create(
                        &config.type_name,
                        config.handle.clone(),
                        config.settings.clone(),
                    )?;
                    fields.push(ConfigField {
                        type_name: field.type_name().to_string(),
                        handle: field.handle().to_string(),
                        label: field.base().label.clone(),
                        settings: field.settings_values(),
                        schema: field.schema(),
                    });
                }
                rows.push(ConfigRow { fields });
            }
            pages.push(ConfigPage {
                label: page.label.clone(),
                rows,
            });
        }
        Ok(BuilderConfig {
            form_id: form.id,
            form_handle: form.handle.clone(),
            title: form.title.clone(),
            pages,
            catalog: self.catalog(store, Some(id)),
        })
    }

    /// Catalog snapshot, excluding one form's own handle when editing.
    pub fn catalog(&self, store: &dyn FormStore, excluding: Option<Ulid>) -> CatalogSnapshot {
        CatalogSnapshot {
            field_types: self.registry.catalog(),
            reserved_handles: RESERVED_HANDLES.iter().map(|h| h.to_string()).collect(),
            form_handles: store.list_handles(excluding),
            max_form_handle_length: MAX_FORM_HANDLE_LENGTH,
            max_field_handle_length: MAX_FIELD_HANDLE_LENGTH,
            statuses: self.statuses.clone(),
            templates: self.templates.clone(),
            variables: self.variables.clone(),
        }
    }

    /// Apply an edited payload to a form.
    ///
    /// Every field type must be registered and every settings payload
    /// must decode. Field handles are resolved against the reserved set
    /// and the handles already accepted in this same pass, so two fields
    /// can never resolve to the same disambiguated handle.
    pub fn apply_payload(&self, form: &mut FormDefinition, payload: FormPayload) -> Result<()> {
        let mut seen: Vec<String> = Vec::new();
        let mut pages = Vec::with_capacity(payload.pages.len());
        for page in payload.pages {
            let mut rows = Vec::with_capacity(page.rows.len());
            for row in page.rows {
                let mut fields = Vec::with_capacity(row.fields.len());
                for config in row.fields {
                    fields.push(self.resolve_field(config, &mut seen)?);
                }
                rows.push(RowConfig { fields });
            }
            pages.push(PageConfig {
                label: page.label,
                rows,
            });
        }
        form.settings = payload.settings;
        form.pages = pages;
        form.notifications = payload.notifications;
        Ok(())
    }

    fn resolve_field(&self, config: FieldConfig, seen: &mut Vec<String>) -> Result<FieldConfig> {
        // Reserved words are not rejected here; disambiguation below
        // resolves them away like any other collision.
        match validate_handle(&config.handle, MAX_FIELD_HANDLE_LENGTH) {
            Ok(()) | Err(HandleIssue::Reserved) => {}
            Err(issue) => {
                return Err(FormwrightError::ValidationFailure {
                    handle: config.handle.clone(),
                    message: issue.to_string(),
                })
            }
        }
        let resolved = unique_handle(seen, &config.handle);
        if resolved != config.handle {
            debug!(
                wanted = %config.handle,
                resolved = %resolved,
                "remediated field handle collision"
            );
        }
        // A suffix can push a handle at the bound past it.
        if resolved.len() > MAX_FIELD_HANDLE_LENGTH {
            return Err(FormwrightError::ValidationFailure {
                handle: config.handle.clone(),
                message: HandleIssue::TooLong {
                    max: MAX_FIELD_HANDLE_LENGTH,
                }
                .to_string(),
            });
        }
        // Instantiating proves the type is registered and the settings
        // decode; the stored tree keeps the raw settings map.
        let field = self
            .registry
            .create(&config.type_name, resolved.clone(), config.settings.clone())?;

        // Re-check the declared schema constraints server-side; the
        // builder guards input but is never trusted alone.
        let mut live_values = field.settings_values();
        live_values.insert("handle".to_string(), Value::String(resolved.clone()));
        let issues = validate_settings(&field.schema(), &live_values);
        if !issues.is_empty() {
            let messages: Vec<String> = issues.into_iter().map(|i| i.message).collect();
            return Err(FormwrightError::ValidationFailure {
                handle: resolved,
                message: messages.join(" "),
            });
        }

        seen.push(resolved.clone());
        Ok(FieldConfig {
            type_name: field.type_name().to_string(),
            handle: resolved,
            settings: config.settings,
        })
    }
}

impl Default for FormBuilderEngine {
    fn default() -> Self {
        Self::new(FieldRegistry::with_defaults())
    }
}

fn default_statuses() -> Vec<FormStatus> {
    vec![FormStatus {
        handle: "new".to_string(),
        label: "New".to_string(),
        color: "green".to_string(),
        is_default: true,
    }]
}

fn default_variables() -> Vec<VariableInfo> {
    [
        ("Form Name", "{formName}"),
        ("Submission ID", "{submissionId}"),
        ("Submission Date", "{submissionDate}"),
        ("Site Name", "{siteName}"),
        ("All Fields", "{allFields}"),
    ]
    .into_iter()
    .map(|(label, value)| VariableInfo {
        label: label.to_string(),
        value: value.to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryFormStore;
    use serde_json::json;

    fn payload_with_handles(handles: &[&str]) -> FormPayload {
        FormPayload {
            pages: vec![PageConfig {
                label: "Page 1".into(),
                rows: vec![RowConfig {
                    fields: handles
                        .iter()
                        .map(|h| FieldConfig {
                            type_name: "single-line-text".into(),
                            handle: (*h).to_string(),
                            settings: json!({"label": "Field"}),
                        })
                        .collect(),
                }],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn missing_form_fails_with_not_found() {
        let engine = FormBuilderEngine::default();
        let store = MemoryFormStore::new();
        let err = engine.builder_config(&store, Ulid::new()).unwrap_err();
        assert!(matches!(err, FormwrightError::NotFound { .. }));
    }

    #[test]
    fn zero_field_form_assembles_empty_pages() {
        let engine = FormBuilderEngine::default();
        let mut store = MemoryFormStore::new();
        let form = FormDefinition::new("empty", "Empty");
        let id = form.id;
        store.save_form(form).unwrap();

        let config = engine.builder_config(&store, id).unwrap();
        assert!(config.pages.is_empty());
        assert_eq!(config.form_handle, "empty");
    }

    #[test]
    fn colliding_handles_get_numeric_suffixes() {
        let engine = FormBuilderEngine::default();
        let mut form = FormDefinition::new("contact", "Contact");
        engine
            .apply_payload(&mut form, payload_with_handles(&["email", "email1", "email"]))
            .unwrap();
        assert_eq!(form.field_handles(), vec!["email", "email1", "email2"]);
    }

    #[test]
    fn reserved_handle_resolves_away_from_the_reserved_word() {
        let engine = FormBuilderEngine::default();
        let mut form = FormDefinition::new("contact", "Contact");
        engine
            .apply_payload(&mut form, payload_with_handles(&["title"]))
            .unwrap();
        assert_eq!(form.field_handles(), vec!["title1"]);
    }

    #[test]
    fn blank_required_label_rejected_on_save() {
        let engine = FormBuilderEngine::default();
        let mut form = FormDefinition::new("contact", "Contact");
        let payload = FormPayload {
            pages: vec![PageConfig {
                label: "Page 1".into(),
                rows: vec![RowConfig {
                    fields: vec![FieldConfig {
                        type_name: "single-line-text".into(),
                        handle: "name".into(),
                        settings: json!({}),
                    }],
                }],
            }],
            ..Default::default()
        };
        let err = engine.apply_payload(&mut form, payload).unwrap_err();
        assert!(matches!(
            err,
            FormwrightError::ValidationFailure { ref handle, ref message }
                if handle == "name" && message.contains("label cannot be blank")
        ));
        assert!(form.pages.is_empty());
    }

    #[test]
    fn declared_range_constraints_enforced_on_save() {
        let engine = FormBuilderEngine::default();
        let mut form = FormDefinition::new("contact", "Contact");
        let payload = FormPayload {
            pages: vec![PageConfig {
                label: "Page 1".into(),
                rows: vec![RowConfig {
                    fields: vec![FieldConfig {
                        type_name: "single-line-text".into(),
                        handle: "summary".into(),
                        settings: json!({"label": "Summary", "visibility": "invisible"}),
                    }],
                }],
            }],
            ..Default::default()
        };
        let err = engine.apply_payload(&mut form, payload).unwrap_err();
        assert!(matches!(
            err,
            FormwrightError::ValidationFailure { ref message, .. }
                if message.contains("visibility must be one of")
        ));
    }

    #[test]
    fn suffixed_handle_cannot_exceed_the_length_bound() {
        let engine = FormBuilderEngine::default();
        let mut form = FormDefinition::new("contact", "Contact");
        let long = "a".repeat(MAX_FIELD_HANDLE_LENGTH);
        let err = engine
            .apply_payload(&mut form, payload_with_handles(&[&long, &long]))
            .unwrap_err();
        assert!(matches!(
            err,
            FormwrightError::ValidationFailure { ref handle, ref message }
                if handle == &long && message.contains("limited to 64 characters")
        ));
    }

    #[test]
    fn malformed_handle_is_a_validation_failure() {
        let engine = FormBuilderEngine::default();
        let mut form = FormDefinition::new("contact", "Contact");
        let err = engine
            .apply_payload(&mut form, payload_with_handles(&["9lives"]))
            .unwrap_err();
        assert!(matches!(
            err,
            FormwrightError::ValidationFailure { ref handle, .. } if handle == "9lives"
        ));
    }

    #[test]
    fn unknown_field_type_rejects_the_whole_payload() {
        let engine = FormBuilderEngine::default();
        let mut form = FormDefinition::new("contact", "Contact");
        let payload = FormPayload {
            pages: vec![PageConfig {
                label: "Page 1".into(),
                rows: vec![RowConfig {
                    fields: vec![FieldConfig {
                        type_name: "signature-pad".into(),
                        handle: "sig".into(),
                        settings: json!({}),
                    }],
                }],
            }],
            ..Default::default()
        };
        let err = engine.apply_payload(&mut form, payload).unwrap_err();
        assert!(matches!(err, FormwrightError::UnknownFieldType { .. }));
        // The form tree is untouched on failure.
        assert!(form.pages.is_empty());
    }

    #[test]
    fn catalog_carries_limits_and_reserved_words() {
        let engine = FormBuilderEngine::default();
        let store = MemoryFormStore::new();
        let catalog = engine.catalog(&store, None);
        assert_eq!(catalog.max_field_handle_length, MAX_FIELD_HANDLE_LENGTH);
        assert!(catalog.reserved_handles.iter().any(|h| h == "title"));
        assert_eq!(catalog.field_types.len(), 8);
        assert!(catalog.statuses[0].is_default);
    }

    #[test]
    fn config_fields_carry_schema_and_settings() {
        let engine = FormBuilderEngine::default();
        let mut store = MemoryFormStore::new();
        let mut form = FormDefinition::new("contact", "Contact");
        engine
            .apply_payload(&mut form, payload_with_handles(&["name"]))
            .unwrap();
        let id = form.id;
        store.save_form(form).unwrap();

        let config = engine.builder_config(&store, id).unwrap();
        let field = &config.pages[0].rows[0].fields[0];
        assert_eq!(field.handle, "name");
        assert_eq!(field.label, "Field");
        assert!(!field.schema.general.is_empty());
        assert_eq!(field.settings["label"], json!("Field"));
    }

    #[test]
    fn operations_map_to_capability_names() {
        assert_eq!(FormOperation::View.capability(), "forms:view");
        assert_eq!(FormOperation::Delete.capability(), "forms:delete");
        let granted = vec!["forms:view".to_string()];
        assert!(FormOperation::View.require(&granted).is_ok());
        assert!(matches!(
            FormOperation::Edit.require(&granted),
            Err(FormwrightError::PermissionDenied { ref capability }) if capability == "forms:edit"
        ));
    }
}
