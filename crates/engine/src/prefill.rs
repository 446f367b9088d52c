//! Pre-fill resolution: what the form looks like before the user types.
//!
//! Runs once per session, keyed by patient id and gated by a "force new"
//! flag. One of two data sources wins, never both:
//!
//! 1. A previously saved assessment's stored snapshot, adopted verbatim
//!    (dates normalised to `YYYY-MM-DD`) for read-only presentation.
//! 2. Fresh patient demographics mapped onto the form's identity fields,
//!    with history tri-states derived from free-text history fields.
//!
//! A failed patient fetch is a load error and is propagated. A failed
//! assessment check is logged and ignored: it degrades to a fresh form
//! rather than blocking the user.

use crate::backend::{Backend, PatientRecord};
use crate::{EngineError, EngineResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use riskform_model::derive::compute_age;
use riskform_model::AssessmentForm;

/// How the session's initial form state was obtained.
#[derive(Clone, Debug, PartialEq)]
pub enum PrefillOutcome {
    /// A blank form pre-filled from patient demographics; editable.
    Fresh(AssessmentForm),
    /// A previously saved assessment adopted verbatim; read-only.
    Existing(AssessmentForm),
}

/// Resolve the initial form state for one patient.
///
/// # Errors
///
/// Returns [`EngineError::Load`] when the patient record cannot be fetched
/// (including an id that does not resolve). Assessment-check failures are
/// non-fatal and fall through to the fresh-form mapping.
pub async fn resolve<B: Backend + ?Sized>(
    backend: &B,
    patient_id: &str,
    force_new: bool,
) -> EngineResult<PrefillOutcome> {
    let patient = backend
        .fetch_patient(patient_id)
        .await
        .map_err(EngineError::Load)?;

    if !force_new {
        match backend.check_assessment(patient_id).await {
            Ok(check) => {
                let has_assessment = check.has_assessment;
                if let Some(snapshot) = check
                    .latest_assessment
                    .filter(|_| has_assessment)
                    .and_then(|latest| latest.form_data)
                {
                    match AssessmentForm::from_snapshot_value(snapshot) {
                        Ok(mut form) => {
                            form.assessment_date = normalize_date(&form.assessment_date);
                            form.birthdate = normalize_date(&form.birthdate);
                            return Ok(PrefillOutcome::Existing(form));
                        }
                        Err(err) => {
                            tracing::warn!(
                                patient_id,
                                error = %err,
                                "stored assessment snapshot unreadable, starting fresh"
                            );
                        }
                    }
                }
            }
            Err(err) => {
                tracing::warn!(
                    patient_id,
                    error = %err,
                    "assessment check failed, starting fresh"
                );
            }
        }
    }

    Ok(PrefillOutcome::Fresh(map_demographics(
        &patient,
        Utc::now().date_naive(),
    )))
}

/// Map patient demographics onto a blank form. Pure function of its inputs.
///
/// `today` anchors the age derivation used when the patient record carries a
/// birthdate but no age.
pub fn map_demographics(patient: &PatientRecord, today: NaiveDate) -> AssessmentForm {
    let mut form = AssessmentForm {
        patient_name: patient.name.clone(),
        sex: display_sex(&patient.gender),
        birthdate: patient
            .birthdate
            .as_deref()
            .map(normalize_date)
            .unwrap_or_default(),
        civil_status: patient.civil_status.clone().unwrap_or_default(),
        contact_number: patient.contact_number.clone().unwrap_or_default(),
        address: patient.address.clone().unwrap_or_default(),
        ..AssessmentForm::default()
    };

    form.age = patient
        .age
        .clone()
        .filter(|age| !age.trim().is_empty())
        .or_else(|| compute_age(&form.birthdate, today))
        .unwrap_or_default();

    if let Some(text) = patient.past_illnesses.as_deref() {
        apply_history_flags(text, &mut form, HistoryKind::Past);
    }
    if let Some(text) = patient.family_history.as_deref() {
        apply_history_flags(text, &mut form, HistoryKind::Family);
    }

    form
}

/// Normalise a date-valued string to `YYYY-MM-DD`, stripping time-of-day.
///
/// Accepts a bare date, an RFC 3339 timestamp, or a zone-less ISO timestamp.
/// Anything else is returned trimmed but otherwise untouched: normalisation
/// must never destroy a value it does not understand.
pub fn normalize_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return stamp.date_naive().format("%Y-%m-%d").to_string();
    }
    if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return stamp.date().format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

#[derive(Clone, Copy)]
enum HistoryKind {
    Past,
    Family,
}

/// Condition keywords searched for, case-insensitively, in free-text
/// history fields.
///
/// A hit sets the matching tri-state to `"Yes"`; no hit leaves it unset,
/// never `"No"` (absence of evidence is not evidence of absence). The search
/// is a plain substring match and does not understand negation, so
/// "no history of hypertension" still matches; that is the behaviour the
/// paper form's users expect to review by eye.
const HISTORY_KEYWORDS: [&str; 8] = [
    "hypertension",
    "diabetes",
    "cancer",
    "stroke",
    "asthma",
    "copd",
    "heart disease",
    "kidney",
];

fn apply_history_flags(text: &str, form: &mut AssessmentForm, kind: HistoryKind) {
    let haystack = text.to_lowercase();
    for (index, keyword) in HISTORY_KEYWORDS.iter().enumerate() {
        if !haystack.contains(keyword) {
            continue;
        }
        let slot = match (kind, index) {
            (HistoryKind::Past, 0) => &mut form.history_hypertension,
            (HistoryKind::Past, 1) => &mut form.history_diabetes,
            (HistoryKind::Past, 2) => &mut form.history_cancer,
            (HistoryKind::Past, 3) => &mut form.history_stroke,
            (HistoryKind::Past, 4) => &mut form.history_asthma,
            (HistoryKind::Past, 5) => &mut form.history_copd,
            (HistoryKind::Past, 6) => &mut form.history_heart_disease,
            (HistoryKind::Past, _) => &mut form.history_kidney_disease,
            (HistoryKind::Family, 0) => &mut form.family_hypertension,
            (HistoryKind::Family, 1) => &mut form.family_diabetes,
            (HistoryKind::Family, 2) => &mut form.family_cancer,
            (HistoryKind::Family, 3) => &mut form.family_stroke,
            (HistoryKind::Family, 4) => &mut form.family_asthma,
            (HistoryKind::Family, 5) => &mut form.family_copd,
            (HistoryKind::Family, 6) => &mut form.family_heart_disease,
            (HistoryKind::Family, _) => &mut form.family_kidney_disease,
        };
        *slot = "Yes".to_string();
    }
}

fn display_sex(gender: &str) -> String {
    match gender.trim().to_ascii_lowercase().as_str() {
        "m" | "male" => "Male".to_string(),
        "f" | "female" => "Female".to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{AssessmentCheck, AssessmentSubmission, BackendError, LatestAssessment};
    use async_trait::async_trait;

    fn sample_patient() -> PatientRecord {
        PatientRecord {
            id: "p1".into(),
            name: "Maria Santos".into(),
            gender: "female".into(),
            age: Some("34".into()),
            birthdate: Some("1990-05-01T00:00:00Z".into()),
            civil_status: Some("Married".into()),
            contact_number: Some("09171234567".into()),
            address: Some("Quezon City".into()),
            past_illnesses: Some("History of Hypertension and Diabetes".into()),
            family_history: Some("Mother had CANCER".into()),
        }
    }

    struct FakeBackend {
        patient: Result<PatientRecord, BackendError>,
        check: Result<AssessmentCheck, BackendError>,
        check_calls: std::sync::atomic::AtomicUsize,
    }

    impl FakeBackend {
        fn new(
            patient: Result<PatientRecord, BackendError>,
            check: Result<AssessmentCheck, BackendError>,
        ) -> Self {
            Self {
                patient,
                check,
                check_calls: std::sync::atomic::AtomicUsize::new(0),
            }
        }

        fn check_calls(&self) -> usize {
            self.check_calls.load(std::sync::atomic::Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Backend for FakeBackend {
        async fn fetch_patient(&self, _patient_id: &str) -> Result<PatientRecord, BackendError> {
            self.patient.clone()
        }

        async fn check_assessment(
            &self,
            _patient_id: &str,
        ) -> Result<AssessmentCheck, BackendError> {
            self.check_calls
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            self.check.clone()
        }

        async fn save_assessment(&self, _submission: AssessmentSubmission) -> Result<(), BackendError> {
            Ok(())
        }
    }

    #[test]
    fn demographics_map_identity_fields() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date");
        let form = map_demographics(&sample_patient(), today);

        assert_eq!(form.patient_name, "Maria Santos");
        assert_eq!(form.sex, "Female");
        assert_eq!(form.birthdate, "1990-05-01");
        assert_eq!(form.age, "34");
        assert_eq!(form.civil_status, "Married");
        assert_eq!(form.contact_number, "09171234567");
        assert_eq!(form.address, "Quezon City");
    }

    #[test]
    fn demographics_derive_age_when_record_has_none() {
        let mut patient = sample_patient();
        patient.age = None;
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date");

        let form = map_demographics(&patient, today);
        assert_eq!(form.age, "34");
    }

    #[test]
    fn history_flags_come_from_substring_search() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date");
        let form = map_demographics(&sample_patient(), today);

        assert_eq!(form.history_hypertension, "Yes");
        assert_eq!(form.history_diabetes, "Yes");
        // No evidence is left unset, never set to "No".
        assert_eq!(form.history_cancer, "");
        assert_eq!(form.family_cancer, "Yes");
        assert_eq!(form.family_hypertension, "");
    }

    #[test]
    fn demographic_mapping_is_idempotent() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date");
        let patient = sample_patient();
        assert_eq!(
            map_demographics(&patient, today),
            map_demographics(&patient, today)
        );
    }

    #[test]
    fn unknown_gender_codes_leave_sex_unset() {
        assert_eq!(display_sex("x"), "");
        assert_eq!(display_sex(""), "");
        assert_eq!(display_sex(" M "), "Male");
    }

    #[test]
    fn normalize_date_strips_time_of_day() {
        assert_eq!(normalize_date("2024-05-01T00:00:00Z"), "2024-05-01");
        assert_eq!(normalize_date("2024-05-01T13:45:12.345Z"), "2024-05-01");
        assert_eq!(normalize_date("2024-05-01T13:45:12"), "2024-05-01");
        assert_eq!(normalize_date("2024-05-01"), "2024-05-01");
    }

    #[test]
    fn normalize_date_leaves_unrecognised_values_alone() {
        assert_eq!(normalize_date(""), "");
        assert_eq!(normalize_date("not a date"), "not a date");
        assert_eq!(normalize_date("  2024-05-01  "), "2024-05-01");
    }

    #[tokio::test]
    async fn resolve_adopts_existing_snapshot_with_normalised_dates() {
        let mut stored = AssessmentForm::default();
        stored.patient_name = "Maria Santos".into();
        stored.assessment_date = "2024-05-01T00:00:00Z".into();
        stored.birthdate = "1990-05-01T00:00:00Z".into();

        let backend = FakeBackend::new(
            Ok(sample_patient()),
            Ok(AssessmentCheck {
                has_assessment: true,
                latest_assessment: Some(LatestAssessment {
                    form_data: Some(serde_json::to_value(&stored).expect("to value")),
                    assessment_date: Some("2024-05-01T00:00:00Z".into()),
                }),
            }),
        );

        let outcome = resolve(&backend, "p1", false).await.expect("resolve");
        let PrefillOutcome::Existing(form) = outcome else {
            panic!("expected existing snapshot to win");
        };
        assert_eq!(form.assessment_date, "2024-05-01");
        assert_eq!(form.birthdate, "1990-05-01");
        assert_eq!(form.patient_name, "Maria Santos");
    }

    #[tokio::test]
    async fn resolve_force_new_skips_the_assessment_check() {
        let backend = FakeBackend::new(
            Ok(sample_patient()),
            Ok(AssessmentCheck {
                has_assessment: true,
                latest_assessment: Some(LatestAssessment {
                    form_data: Some(serde_json::json!({"patientName": "stale"})),
                    assessment_date: None,
                }),
            }),
        );

        let outcome = resolve(&backend, "p1", true).await.expect("resolve");
        assert!(matches!(outcome, PrefillOutcome::Fresh(_)));
        assert_eq!(backend.check_calls(), 0);
    }

    #[tokio::test]
    async fn resolve_falls_back_to_fresh_when_check_fails() {
        let backend = FakeBackend::new(
            Ok(sample_patient()),
            Err(BackendError::Transport("connection refused".into())),
        );

        let outcome = resolve(&backend, "p1", false).await.expect("resolve");
        let PrefillOutcome::Fresh(form) = outcome else {
            panic!("check failure must degrade to a fresh form");
        };
        assert_eq!(form.patient_name, "Maria Santos");
    }

    #[tokio::test]
    async fn resolve_falls_back_when_assessment_has_no_snapshot() {
        let backend = FakeBackend::new(
            Ok(sample_patient()),
            Ok(AssessmentCheck {
                has_assessment: true,
                latest_assessment: Some(LatestAssessment {
                    form_data: None,
                    assessment_date: Some("2024-05-01".into()),
                }),
            }),
        );

        let outcome = resolve(&backend, "p1", false).await.expect("resolve");
        assert!(matches!(outcome, PrefillOutcome::Fresh(_)));
    }

    #[tokio::test]
    async fn resolve_propagates_patient_load_failure() {
        let backend = FakeBackend::new(
            Err(BackendError::NotFound),
            Ok(AssessmentCheck::default()),
        );

        let err = resolve(&backend, "missing", false)
            .await
            .expect_err("missing patient is a load error");
        assert!(matches!(err, EngineError::Load(BackendError::NotFound)));
    }
}
