//! # Riskform Engine
//!
//! Business logic for the risk-assessment form:
//! - [`prefill`]: populate a blank form from patient demographics or adopt a
//!   previously saved assessment snapshot
//! - [`session`]: the form session (view-mode state machine, validation
//!   error lifecycle, duplicate-submit guard, save flow)
//! - [`document`]: the printable-document template and the renderer seam
//! - [`backend`]: the port trait the engine talks to the remote API through
//!
//! The engine never performs I/O itself; everything remote goes through the
//! [`backend::Backend`] trait, and document rendering goes through
//! [`document::DocumentRenderer`]. `riskform-client` provides the production
//! implementation of the backend port.

pub mod backend;
pub mod document;
pub mod prefill;
pub mod session;

pub use backend::{
    AssessmentCheck, AssessmentSubmission, Backend, BackendError, LatestAssessment, PatientRecord,
};
pub use document::{DocumentArtifact, DocumentRenderer, RenderError};
pub use prefill::PrefillOutcome;
pub use session::{BackAction, FormSession, SessionKind, ViewMode};

/// Errors returned by the form engine.
///
/// Nothing here is fatal: load failures leave the user with an empty form,
/// validation failures are cleared by editing, and save failures retain the
/// form state for retry.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The patient record could not be loaded during pre-fill.
    #[error("failed to load patient record: {0}")]
    Load(#[source] BackendError),

    /// Required fields are missing; the per-field messages live on the
    /// session's [`ValidationErrors`](riskform_model::ValidationErrors).
    #[error("form has missing required fields")]
    Validation,

    /// A save for this form is already in flight.
    #[error("a save is already in progress")]
    SaveInFlight,

    /// Saved assessments are append-only; a viewing session cannot save.
    #[error("a saved assessment cannot be modified")]
    ReadOnlySession,

    /// The persistence call failed; the form state is retained for retry.
    #[error("failed to save assessment: {0}")]
    Save(#[source] BackendError),

    /// The external document renderer failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Form-model failure (snapshot serialisation, value-shape mismatch).
    #[error(transparent)]
    Form(#[from] riskform_model::FormError),
}

/// Type alias for Results that can fail with an [`EngineError`].
pub type EngineResult<T> = std::result::Result<T, EngineError>;
