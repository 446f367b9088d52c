//! Backend port: the trait the engine uses to reach the remote API.
//!
//! The engine only ever sees this trait; the reqwest-based implementation
//! lives in `riskform-client`, and tests substitute an in-memory fake. The
//! error type is deliberately flat: the UI treats every remote failure the
//! same way, as a user-visible message, with no transient/permanent
//! distinction and no retries.

use crate::document::DocumentArtifact;
use async_trait::async_trait;

/// Patient demographics as returned by `GET /patients/{id}`.
///
/// Free-text history fields are carried verbatim; the pre-fill resolver
/// derives tri-state flags from them by substring search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatientRecord {
    pub id: String,
    pub name: String,
    /// Low-cardinality gender code, e.g. `male` / `female` / `m` / `f`.
    pub gender: String,
    pub age: Option<String>,
    pub birthdate: Option<String>,
    pub civil_status: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub past_illnesses: Option<String>,
    pub family_history: Option<String>,
}

/// Result of `GET /patients/{id}/risk-assessment/check`.
#[derive(Clone, Debug, Default)]
pub struct AssessmentCheck {
    pub has_assessment: bool,
    pub latest_assessment: Option<LatestAssessment>,
}

/// The latest saved assessment for a patient, when one exists.
#[derive(Clone, Debug, Default)]
pub struct LatestAssessment {
    /// The stored form snapshot. Absent when the record predates snapshot
    /// storage; adoption is skipped in that case.
    pub form_data: Option<serde_json::Value>,
    pub assessment_date: Option<String>,
}

/// Everything posted to `POST /risk-assessments`.
#[derive(Clone, Debug)]
pub struct AssessmentSubmission {
    pub patient_id: String,
    /// JSON-stringified full form snapshot.
    pub form_data: String,
    pub assessment_date: String,
    pub document: DocumentArtifact,
}

/// Remote-call failure as seen by the engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("patient not found")]
    NotFound,

    #[error("session expired")]
    Unauthorized,

    /// Server-provided failure message, surfaced to the user verbatim.
    #[error("{0}")]
    Remote(String),

    #[error("network error: {0}")]
    Transport(String),
}

/// Remote API operations used by the form engine.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch patient demographics by id.
    async fn fetch_patient(&self, patient_id: &str) -> Result<PatientRecord, BackendError>;

    /// Query whether the patient already has a saved assessment.
    async fn check_assessment(&self, patient_id: &str) -> Result<AssessmentCheck, BackendError>;

    /// Persist a completed assessment (snapshot plus rendered document).
    async fn save_assessment(&self, submission: AssessmentSubmission) -> Result<(), BackendError>;
}
