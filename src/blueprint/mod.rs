//! Form blueprints
//!
//! A blueprint is the declarative schema of a form: ordered sections holding
//! typed components. It is supplied by an external source (usually JSON) and
//! never modified by a session.

pub mod loader;
pub mod model;

pub use loader::{
    load_blueprint_file, parse_blueprint, BlueprintError, BlueprintFormat, LoadReport,
    SkippedComponent,
};
pub use model::{
    Component, ComponentKind, ComponentType, DatePickerSpec, DynamicKeyValueTableSpec,
    DynamicListSpec, FormBlueprint, InstructionalTextSpec, KeyValueTableSpec, NumberRangeSpec,
    Question, QuestionInputType, QuestionListSpec, Section, ValidationRules,
    WeightedCriteriaListSpec,
};
