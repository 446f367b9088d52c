//! # Riskform Model
//!
//! Data model for the standardised risk-assessment form.
//!
//! This crate contains pure data operations only:
//! - The [`AssessmentForm`] record (every field the form captures, always
//!   fully defined) and its JSON snapshot serialisation
//! - Typed field addressing via [`FieldId`] (no stringly-typed paths)
//! - Derived-field calculation (BMI, age)
//! - Required-field validation producing an ordered [`ValidationErrors`]
//!
//! **No I/O concerns**: fetching patients, saving assessments, or rendering
//! documents belong in `riskform-engine` and `riskform-client`.

pub mod derive;
pub mod field;
pub mod form;
pub mod validate;

pub use field::{DmSymptom, FieldId, FieldValue, Medication};
pub use form::{AssessmentForm, DmSymptoms, Medications};
pub use validate::{validate, ValidationErrors, REQUIRED_FIELDS};

/// Errors returned by the form model.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// A value of the wrong shape was written to a field, for example a
    /// checkbox boolean into a text field.
    #[error("field '{field}' expects a {expected} value")]
    ValueType {
        field: &'static str,
        expected: &'static str,
    },

    /// Snapshot encode/decode failure.
    #[error("invalid form snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Type alias for Results that can fail with a [`FormError`].
pub type FormResult<T> = std::result::Result<T, FormError>;
