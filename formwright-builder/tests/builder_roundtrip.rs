//! End-to-end pass: author a form through the engine, assemble its
//! builder config, then run submissions against it.

use formwright_builder::{
    FormBuilderEngine, FormDefinition, FormPayload, FormStore, MemoryFormStore, SubmissionOutcome,
};
use formwright_common::FormwrightError;
use serde_json::{json, Map, Value};
use ulid::Ulid;

fn contact_payload() -> FormPayload {
    serde_json::from_value(json!({
        "settings": {"displayFormTitle": true},
        "pages": [{
            "label": "Contact",
            "rows": [
                {"fields": [
                    {"type": "single-line-text", "handle": "name",
                     "settings": {"label": "Name", "required": true}},
                    {"type": "email", "handle": "email",
                     "settings": {"label": "Email", "required": true}}
                ]},
                {"fields": [
                    {"type": "email", "handle": "email",
                     "settings": {"label": "Confirm Email", "matchField": "email"}},
                    {"type": "multi-line-text", "handle": "message",
                     "settings": {"label": "Message", "limit": true,
                                  "min": 3, "minType": "characters"}}
                ]}
            ]
        }],
        "notifications": [{"name": "Admin", "enabled": true,
                           "recipients": "admin@example.com"}]
    }))
    .expect("payload decodes")
}

fn authored_form(engine: &FormBuilderEngine, store: &mut MemoryFormStore) -> Ulid {
    let mut form = FormDefinition::new("contact", "Contact Us");
    engine
        .apply_payload(&mut form, contact_payload())
        .expect("payload applies");
    let id = form.id;
    store.save_form(form).expect("form saves");
    id
}

#[test]
fn author_assemble_submit_round_trip() {
    let engine = FormBuilderEngine::default();
    let mut store = MemoryFormStore::new();
    let id = authored_form(&engine, &mut store);

    // The colliding confirmation handle was remediated during apply.
    let form = store.load_form(id).expect("form loads");
    assert_eq!(
        form.field_handles(),
        vec!["name", "email", "email1", "message"]
    );

    let config = engine.builder_config(&store, id).expect("config assembles");
    assert_eq!(config.form_handle, "contact");
    assert_eq!(config.pages.len(), 1);
    assert_eq!(config.pages[0].rows.len(), 2);

    // Every field node carries its schema and live settings.
    let confirm = &config.pages[0].rows[1].fields[0];
    assert_eq!(confirm.handle, "email1");
    assert_eq!(confirm.settings["matchField"], json!("email"));
    assert!(!confirm.schema.settings.is_empty());

    // The whole config serializes for the UI boundary.
    let wire = serde_json::to_value(&config).expect("config serializes");
    assert_eq!(wire["formHandle"], json!("contact"));
    assert!(wire["catalog"]["fieldTypes"].as_array().is_some());

    let posted: Map<String, Value> = serde_json::from_value(json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "email1": "ada@example.com",
        "message": "Hello there"
    }))
    .expect("posted decodes");
    let outcome = formwright_builder::submit(engine.registry(), &form, &posted)
        .expect("pipeline runs");
    assert!(outcome.is_accepted());
}

#[test]
fn rejected_submission_reports_every_failing_field() {
    let engine = FormBuilderEngine::default();
    let mut store = MemoryFormStore::new();
    let id = authored_form(&engine, &mut store);
    let form = store.load_form(id).expect("form loads");

    let posted: Map<String, Value> = serde_json::from_value(json!({
        "email": "nope",
        "message": "hi"
    }))
    .expect("posted decodes");
    let outcome = formwright_builder::submit(engine.registry(), &form, &posted)
        .expect("pipeline runs");

    let SubmissionOutcome::Rejected { errors } = outcome else {
        panic!("expected rejection");
    };
    assert_eq!(errors["name"], vec!["This field is required."]);
    assert_eq!(errors["email"], vec!["Please enter a valid email address."]);
    assert_eq!(
        errors["message"],
        vec!["You must enter at least 3 characters."]
    );
    // The optional confirmation field was left blank and stays clean.
    assert!(!errors.contains_key("email1"));
}

#[test]
fn missing_form_never_yields_a_partial_config() {
    let engine = FormBuilderEngine::default();
    let store = MemoryFormStore::new();
    let result = engine.builder_config(&store, Ulid::new());
    assert!(matches!(result, Err(FormwrightError::NotFound { .. })));
}

#[test]
fn zero_field_form_assembles_an_empty_tree() {
    let engine = FormBuilderEngine::default();
    let mut store = MemoryFormStore::new();
    let form = FormDefinition::new("blank", "Blank");
    let id = form.id;
    store.save_form(form).expect("form saves");

    let config = engine.builder_config(&store, id).expect("config assembles");
    assert!(config.pages.is_empty());
    assert!(!config.catalog.field_types.is_empty());
}

#[test]
fn catalog_excludes_the_form_being_edited() {
    let engine = FormBuilderEngine::default();
    let mut store = MemoryFormStore::new();
    let id = authored_form(&engine, &mut store);
    let other = FormDefinition::new("survey", "Survey");
    store.save_form(other).expect("form saves");

    let config = engine.builder_config(&store, id).expect("config assembles");
    assert_eq!(config.catalog.form_handles, vec!["survey"]);
}
