// Clippy allows for reasonable defaults
#![allow(clippy::new_without_default)] // Default not always appropriate for stateful types
#![allow(clippy::derivable_impls)] // Explicit Default impls can be clearer
#![allow(clippy::unnecessary_map_or)] // map_or can be clearer than alternatives
#![allow(clippy::redundant_closure)] // |x| f(x) can be clearer than f

//! Schema-driven dynamic form engine for RFQ questionnaires.
//!
//! A [`FormBlueprint`] describes sections of typed components; a
//! [`FormSession`] binds it to a shared answer document with section
//! navigation, advisory validation, auto-save and submission. The
//! [`WizardSession`] runs the fixed RFQ authoring steps on the same machinery.

// Module declarations
pub mod answers;
pub mod blueprint;
pub mod config;
pub mod error;
pub mod events;
pub mod fields;
pub mod session;
pub mod storage;
mod utils;
pub mod wizard;

pub use answers::{AnswerStore, FieldPath, FieldValue, FormData};
pub use blueprint::{
    load_blueprint_file, parse_blueprint, BlueprintError, BlueprintFormat, Component,
    ComponentKind, ComponentType, FormBlueprint, LoadReport, Section,
};
pub use config::{load_merged_config, FormsConfig, PartialConfig};
pub use error::{FormError, FormResult};
pub use events::{EventBroadcaster, FormEvent, FormObserver};
pub use fields::{Advisory, FieldEdit, FieldError, FieldRegistry, FieldView, SectionView};
pub use session::{
    ActiveContext, AutoSaveSink, FormSession, MemorySink, SaveStatus, SessionOptions,
    SmartAssistHook, SubmissionSink,
};
pub use storage::FileDraftSink;
pub use utils::{drafts_dir, forms_dir};
pub use wizard::{StepStatus, Suggestion, WizardSession, WizardStep};

/// Initialize `env_logger` with an `info` default, overridable via `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging();
        init_logging();
        log::info!("[Logging] initialized twice");
    }
}
