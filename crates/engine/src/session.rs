//! The form session: view-mode state machine, validation-error lifecycle
//! and the save flow.
//!
//! A session begins either as a fresh assessment (editable form) or as a
//! read-only view of a previously saved one. Saved assessments are
//! append-only: there is no edit path for historical records, correcting one
//! means creating a new one. The session enforces that rule, owns the
//! per-field validation errors, and guards against duplicate submissions
//! while a save is in flight.

use crate::backend::{AssessmentSubmission, Backend};
use crate::document::{self, DocumentArtifact, DocumentRenderer};
use crate::prefill::{self, PrefillOutcome};
use crate::{EngineError, EngineResult};
use chrono::Utc;
use riskform_model::{validate, AssessmentForm, FieldId, FieldValue, FormResult, ValidationErrors};
use std::sync::atomic::{AtomicBool, Ordering};

/// Which surface is currently shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
    /// The editable form.
    Form,
    /// The rendered-document preview (or read-only historical view).
    Pdf,
}

/// How the session began.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionKind {
    /// A new assessment being drafted.
    Fresh,
    /// A read-only view of a previously saved assessment.
    ViewingExisting,
}

/// What "back" from the document view means for this session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackAction {
    /// Return to the editable form with state intact.
    ReturnToForm,
    /// Leave for the patient detail view; there is nothing to edit here.
    ExitToPatientDetail,
}

/// One patient's assessment-form session.
pub struct FormSession {
    patient_id: String,
    kind: SessionKind,
    mode: ViewMode,
    form: AssessmentForm,
    errors: ValidationErrors,
    save_in_flight: AtomicBool,
}

impl FormSession {
    /// Start a session for one patient, resolving the pre-fill source.
    ///
    /// With `force_new` set the existing-assessment check is skipped and the
    /// session always starts fresh.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Load`] when the patient record cannot be
    /// fetched. Other pre-fill failures degrade to a fresh form.
    pub async fn start<B: Backend + ?Sized>(
        backend: &B,
        patient_id: impl Into<String>,
        force_new: bool,
    ) -> EngineResult<Self> {
        let patient_id = patient_id.into();
        let (form, kind, mode) = match prefill::resolve(backend, &patient_id, force_new).await? {
            PrefillOutcome::Fresh(form) => (form, SessionKind::Fresh, ViewMode::Form),
            PrefillOutcome::Existing(form) => (form, SessionKind::ViewingExisting, ViewMode::Pdf),
        };

        Ok(Self {
            patient_id,
            kind,
            mode,
            form,
            errors: ValidationErrors::default(),
            save_in_flight: AtomicBool::new(false),
        })
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn form(&self) -> &AssessmentForm {
        &self.form
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Apply one user edit.
    ///
    /// Clears any existing validation error for the edited field and no
    /// other.
    pub fn edit(&mut self, field: FieldId, value: FieldValue) -> FormResult<()> {
        self.form.set_field(field, value)?;
        self.errors.clear(field);
        Ok(())
    }

    /// Attempt the form-to-preview transition.
    ///
    /// On validation failure the error map is replaced with the fresh result
    /// and the view stays on the form; the caller should focus the first
    /// entry of [`errors`](Self::errors).
    pub fn submit(&mut self) -> EngineResult<()> {
        let errors = validate(&self.form);
        if errors.is_empty() {
            self.errors = errors;
            self.mode = ViewMode::Pdf;
            Ok(())
        } else {
            self.errors = errors;
            Err(EngineError::Validation)
        }
    }

    /// Leave the document view.
    ///
    /// Fresh sessions return to the form with every value intact; sessions
    /// viewing a saved assessment navigate away instead, because saved
    /// assessments cannot be edited.
    pub fn back(&mut self) -> BackAction {
        match self.kind {
            SessionKind::Fresh => {
                self.mode = ViewMode::Form;
                BackAction::ReturnToForm
            }
            SessionKind::ViewingExisting => BackAction::ExitToPatientDetail,
        }
    }

    /// Render the document and persist the assessment.
    ///
    /// Only one save per session may be in flight: a second call while the
    /// first is outstanding is rejected with [`EngineError::SaveInFlight`]
    /// before anything touches the network. The form state is left intact on
    /// failure so the user can retry without re-entering data.
    ///
    /// # Errors
    ///
    /// [`EngineError::ReadOnlySession`] for viewing sessions,
    /// [`EngineError::Render`] when the document renderer fails,
    /// [`EngineError::Save`] when the upload fails.
    pub async fn save<B, R>(&self, backend: &B, renderer: &R) -> EngineResult<()>
    where
        B: Backend + ?Sized,
        R: DocumentRenderer + ?Sized,
    {
        if self.kind == SessionKind::ViewingExisting {
            return Err(EngineError::ReadOnlySession);
        }
        if self.save_in_flight.swap(true, Ordering::SeqCst) {
            return Err(EngineError::SaveInFlight);
        }

        let result = self.save_inner(backend, renderer).await;
        self.save_in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn save_inner<B, R>(&self, backend: &B, renderer: &R) -> EngineResult<()>
    where
        B: Backend + ?Sized,
        R: DocumentRenderer + ?Sized,
    {
        let html = document::render_html(&self.form);
        let bytes = renderer.render(&html)?;
        let document = DocumentArtifact {
            file_name: document::assessment_file_name(&self.patient_id),
            bytes,
        };

        let assessment_date = if self.form.assessment_date.trim().is_empty() {
            Utc::now().to_rfc3339()
        } else {
            self.form.assessment_date.clone()
        };

        let submission = AssessmentSubmission {
            patient_id: self.patient_id.clone(),
            form_data: self.form.to_snapshot()?,
            assessment_date,
            document,
        };

        backend
            .save_assessment(submission)
            .await
            .map_err(EngineError::Save)
    }
}
