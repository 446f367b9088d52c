//! The API gateway: reqwest calls against the `/api` surface.
//!
//! Wire structs here are deliberately forgiving (`#[serde(default)]`, loose
//! id/age typing): the backend serialises from a dynamically-typed store and
//! is not strict about number-versus-string. Conversion into the engine's
//! domain types happens at this boundary and nowhere else.

use crate::token::AccessToken;
use crate::{ApiError, ApiResult, ClientConfig, GENERIC_FAILURE_MESSAGE};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use riskform_engine::{
    AssessmentCheck, AssessmentSubmission, Backend, BackendError, LatestAssessment, PatientRecord,
};
use serde::Deserialize;
use std::sync::Arc;

/// Client for the remote records API.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    cfg: ClientConfig,
    token: Arc<AccessToken>,
}

impl ApiClient {
    /// Build a client from resolved configuration and an injected
    /// credential.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when the underlying HTTP client
    /// cannot be constructed.
    pub fn new(cfg: ClientConfig, token: Arc<AccessToken>) -> ApiResult<Self> {
        let http = reqwest::Client::builder().timeout(cfg.timeout()).build()?;
        Ok(Self { http, cfg, token })
    }

    /// `GET /api/patients/{id}`.
    pub async fn fetch_patient(&self, patient_id: &str) -> ApiResult<PatientRecord> {
        let url = self.cfg.api_url(&format!("/patients/{patient_id}"));
        let response = self.get(&url).await?;
        let envelope: PatientEnvelope = response.json().await?;
        Ok(envelope.patient.into_record())
    }

    /// `GET /api/patients/{id}/risk-assessment/check`.
    pub async fn check_assessment(&self, patient_id: &str) -> ApiResult<AssessmentCheck> {
        let url = self
            .cfg
            .api_url(&format!("/patients/{patient_id}/risk-assessment/check"));
        let response = self.get(&url).await?;
        let envelope: CheckEnvelope = response.json().await?;
        Ok(envelope.into_check())
    }

    /// `POST /api/risk-assessments` as a multipart submission.
    ///
    /// The response body is ignored beyond its status; a failure carries the
    /// server-provided message when one is present.
    pub async fn save_assessment(&self, submission: AssessmentSubmission) -> ApiResult<()> {
        let bearer = self.token.bearer()?;
        let document = Part::bytes(submission.document.bytes)
            .file_name(submission.document.file_name)
            .mime_str("application/pdf")?;
        let form = Form::new()
            .text("patient_id", submission.patient_id)
            .text("form_data", submission.form_data)
            .text("assessment_date", submission.assessment_date)
            .part("pdf_file", document);

        let url = self.cfg.api_url("/risk-assessments");
        let response = self
            .http
            .post(&url)
            .bearer_auth(bearer)
            .multipart(form)
            .send()
            .await?;
        self.check_status(response).await?;
        Ok(())
    }

    async fn get(&self, url: &str) -> ApiResult<Response> {
        let bearer = self.token.bearer()?;
        let response = self.http.get(url).bearer_auth(bearer).send().await?;
        self.check_status(response).await
    }

    async fn check_status(&self, response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("access token rejected, revoking credential");
            self.token.revoke();
            return Err(ApiError::Unauthorized);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::into_message)
            .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
        Err(ApiError::Http {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn fetch_patient(&self, patient_id: &str) -> Result<PatientRecord, BackendError> {
        ApiClient::fetch_patient(self, patient_id)
            .await
            .map_err(BackendError::from)
    }

    async fn check_assessment(&self, patient_id: &str) -> Result<AssessmentCheck, BackendError> {
        ApiClient::check_assessment(self, patient_id)
            .await
            .map_err(BackendError::from)
    }

    async fn save_assessment(&self, submission: AssessmentSubmission) -> Result<(), BackendError> {
        ApiClient::save_assessment(self, submission)
            .await
            .map_err(BackendError::from)
    }
}

// ============================================================================
// Wire types (internal)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PatientEnvelope {
    patient: PatientWire,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PatientWire {
    id: serde_json::Value,
    name: String,
    gender: String,
    age: Option<serde_json::Value>,
    birthdate: Option<String>,
    civil_status: Option<String>,
    contact_number: Option<String>,
    address: Option<String>,
    past_illnesses: Option<String>,
    family_history: Option<String>,
}

impl PatientWire {
    fn into_record(self) -> PatientRecord {
        PatientRecord {
            id: loose_text(&self.id).unwrap_or_default(),
            name: self.name,
            gender: self.gender,
            age: self.age.as_ref().and_then(loose_text),
            birthdate: self.birthdate,
            civil_status: self.civil_status,
            contact_number: self.contact_number,
            address: self.address,
            past_illnesses: self.past_illnesses,
            family_history: self.family_history,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CheckEnvelope {
    has_assessment: bool,
    latest_assessment: Option<LatestWire>,
}

impl CheckEnvelope {
    fn into_check(self) -> AssessmentCheck {
        AssessmentCheck {
            has_assessment: self.has_assessment,
            latest_assessment: self.latest_assessment.map(|latest| LatestAssessment {
                form_data: latest.form_data,
                assessment_date: latest.assessment_date,
            }),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LatestWire {
    form_data: Option<serde_json::Value>,
    assessment_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .filter(|message| !message.trim().is_empty())
    }
}

/// Render a JSON scalar as text: ids and ages arrive as either strings or
/// numbers depending on the backend's store.
fn loose_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
