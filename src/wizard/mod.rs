//! RFQ authoring wizard
//!
//! A fixed sequence of steps, independent of any blueprint file, sharing the
//! session machinery (answer store, auto-save, submission, smart assist) with
//! blueprint forms.

pub mod controller;
pub mod steps;
pub mod suggestions;

pub use controller::{StepStatus, WizardSession};
pub use steps::{wizard_blueprint, WizardStep};
pub use suggestions::{suggestions_for, Suggestion};
