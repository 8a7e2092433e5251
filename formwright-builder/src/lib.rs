//! # Formwright Builder
//!
//! Form definitions, builder config assembly, and the submission
//! pipeline. The engine is explicit state passed to callers rather than
//! process-global: construct a [`FormBuilderEngine`] once, hand it a
//! [`FormStore`], and every assembly or submission pass is request-scoped
//! from there.

pub mod engine;
pub mod form;
pub mod stencil;
pub mod store;
pub mod submission;

pub use engine::{
    BuilderConfig, CatalogSnapshot, ConfigField, ConfigPage, ConfigRow, FormBuilderEngine,
    FormOperation, FormStatus, TemplateInfo, VariableInfo,
};
pub use form::{
    FieldConfig, FormDefinition, FormPayload, FormSettings, NotificationConfig, PageConfig,
    RowConfig,
};
pub use stencil::Stencil;
pub use store::{FormStore, MemoryFormStore};
pub use submission::{run_pipeline, submit, SubmissionOutcome};
