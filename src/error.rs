use crate::fields::FieldError;
use thiserror::Error;

/// Errors returned by form and wizard sessions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Unknown section: {0}")]
    UnknownSection(String),

    #[error("Section index {index} out of range (form has {len} sections)")]
    SectionOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("Session is closed")]
    SessionClosed,

    #[error("Submission failed: {0}")]
    Submission(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type FormResult<T> = Result<T, FormError>;
