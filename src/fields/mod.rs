//! Field codecs and the renderer registry
//!
//! Dispatch is purely data-driven: a component's `componentType` selects a
//! codec from the [`FieldRegistry`]. Adding a field type means registering a
//! codec, not touching the callers.

pub mod codec;
pub mod codecs;
pub mod derive;
pub mod registry;

pub use codec::{Advisory, AdvisoryKind, FieldCodec, FieldEdit, FieldError};
pub use registry::{FieldRegistry, FieldView, SectionView};
