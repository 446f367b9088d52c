//! The assessment form record and its snapshot serialisation.
//!
//! [`AssessmentForm`] is the single source of truth for everything the form
//! captures. It is always fully defined: every field exists from the moment
//! the form is constructed, and edits only overwrite values, never remove
//! them, so the JSON snapshot never has to handle partial shapes.
//!
//! Tri-state fields (red flags, histories, medications) hold `"Yes"`, `"No"`
//! or the empty string. Numeric-looking fields (age, weight, labs) hold raw
//! strings exactly as entered; the only numeric interpretation anywhere is
//! the derived `bmi` field, which is recomputed on every edit of weight or
//! height and cannot be written directly.

use crate::derive::compute_bmi;
use crate::field::{DmSymptom, FieldId, FieldValue, Medication};
use crate::{FormError, FormResult};
use serde::{Deserialize, Serialize};

/// Diabetes-symptom checklist, nested under `dmSymptoms` in the snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DmSymptoms {
    pub polyuria: bool,
    pub polydipsia: bool,
    pub polyphagia: bool,
    pub weight_loss: bool,
    pub blurred_vision: bool,
    pub slow_wound_healing: bool,
    pub numbness: bool,
}

/// Current medications, nested under `medications` in the snapshot.
///
/// Yes/No strings rather than booleans: the form distinguishes "answered No"
/// from "not answered".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Medications {
    pub antihypertensive: String,
    pub oral_hypoglycemic: String,
    pub insulin: String,
    pub lipid_lowering: String,
    pub antiplatelet: String,
}

/// The full risk-assessment form for one patient encounter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssessmentForm {
    // Identity and encounter
    pub assessment_date: String,
    pub patient_name: String,
    pub age: String,
    pub sex: String,
    pub birthdate: String,
    pub civil_status: String,
    pub contact_number: String,
    pub address: String,
    pub occupation: String,

    // Red flags
    pub chest_pain: String,
    pub difficulty_breathing: String,
    pub loss_of_consciousness: String,
    pub slurred_speech: String,
    pub facial_asymmetry: String,
    pub weakness_of_extremity: String,
    pub seizures: String,
    pub severe_headache: String,

    // Past medical history
    pub history_hypertension: String,
    pub history_diabetes: String,
    pub history_cancer: String,
    pub history_stroke: String,
    pub history_asthma: String,
    pub history_copd: String,
    pub history_heart_disease: String,
    pub history_kidney_disease: String,

    // Family history
    pub family_hypertension: String,
    pub family_diabetes: String,
    pub family_cancer: String,
    pub family_stroke: String,
    pub family_asthma: String,
    pub family_copd: String,
    pub family_heart_disease: String,
    pub family_kidney_disease: String,

    // Lifestyle and risk factors
    pub smoking_status: String,
    pub alcohol_intake: String,
    pub physical_activity: String,
    pub eats_vegetables: String,
    pub eats_fruit: String,
    pub high_salt_intake: String,
    pub high_fat_intake: String,

    // Anthropometrics and vitals
    pub weight: String,
    pub height: String,
    /// Derived from weight and height; never user-editable.
    pub bmi: String,
    pub waist_circumference: String,
    pub systolic_bp: String,
    pub diastolic_bp: String,

    // Laboratory results
    pub fasting_blood_sugar: String,
    pub random_blood_sugar: String,
    pub total_cholesterol: String,
    pub hdl: String,
    pub ldl: String,
    pub triglycerides: String,
    pub urine_protein: String,
    pub urine_ketones: String,

    // Nested groups
    pub dm_symptoms: DmSymptoms,
    pub medications: Medications,

    // Management and follow-up
    pub risk_level: String,
    pub management_plan: String,
    pub lifestyle_advice: String,
    pub referred: String,
    pub referral_reason: String,
    pub follow_up_date: String,
    pub assessed_by: String,
}

impl AssessmentForm {
    /// Write a value to a field.
    ///
    /// Checkbox fields (`dmSymptoms.*`) accept only [`FieldValue::Checked`];
    /// every other field accepts only [`FieldValue::Text`]. A mismatch is a
    /// [`FormError::ValueType`] and leaves the form untouched.
    ///
    /// Editing `weight` or `height` recomputes `bmi`; when either input is
    /// missing or non-numeric the derived value is cleared.
    pub fn set_field(&mut self, field: FieldId, value: FieldValue) -> FormResult<()> {
        match value {
            FieldValue::Checked(on) => {
                let FieldId::DmSymptom(symptom) = field else {
                    return Err(FormError::ValueType {
                        field: field.wire_name(),
                        expected: "text",
                    });
                };
                *self.dm_symptoms.slot_mut(symptom) = on;
            }
            FieldValue::Text(text) => {
                let Some(slot) = self.text_slot_mut(field) else {
                    return Err(FormError::ValueType {
                        field: field.wire_name(),
                        expected: "checkbox",
                    });
                };
                *slot = text;
            }
        }

        if matches!(field, FieldId::Weight | FieldId::Height) {
            self.bmi = compute_bmi(&self.weight, &self.height).unwrap_or_default();
        }

        Ok(())
    }

    /// Read a text field's current value. `None` for checkbox fields.
    pub fn text(&self, field: FieldId) -> Option<&str> {
        let value = match field {
            FieldId::AssessmentDate => &self.assessment_date,
            FieldId::PatientName => &self.patient_name,
            FieldId::Age => &self.age,
            FieldId::Sex => &self.sex,
            FieldId::Birthdate => &self.birthdate,
            FieldId::CivilStatus => &self.civil_status,
            FieldId::ContactNumber => &self.contact_number,
            FieldId::Address => &self.address,
            FieldId::Occupation => &self.occupation,
            FieldId::ChestPain => &self.chest_pain,
            FieldId::DifficultyBreathing => &self.difficulty_breathing,
            FieldId::LossOfConsciousness => &self.loss_of_consciousness,
            FieldId::SlurredSpeech => &self.slurred_speech,
            FieldId::FacialAsymmetry => &self.facial_asymmetry,
            FieldId::WeaknessOfExtremity => &self.weakness_of_extremity,
            FieldId::Seizures => &self.seizures,
            FieldId::SevereHeadache => &self.severe_headache,
            FieldId::HistoryHypertension => &self.history_hypertension,
            FieldId::HistoryDiabetes => &self.history_diabetes,
            FieldId::HistoryCancer => &self.history_cancer,
            FieldId::HistoryStroke => &self.history_stroke,
            FieldId::HistoryAsthma => &self.history_asthma,
            FieldId::HistoryCopd => &self.history_copd,
            FieldId::HistoryHeartDisease => &self.history_heart_disease,
            FieldId::HistoryKidneyDisease => &self.history_kidney_disease,
            FieldId::FamilyHypertension => &self.family_hypertension,
            FieldId::FamilyDiabetes => &self.family_diabetes,
            FieldId::FamilyCancer => &self.family_cancer,
            FieldId::FamilyStroke => &self.family_stroke,
            FieldId::FamilyAsthma => &self.family_asthma,
            FieldId::FamilyCopd => &self.family_copd,
            FieldId::FamilyHeartDisease => &self.family_heart_disease,
            FieldId::FamilyKidneyDisease => &self.family_kidney_disease,
            FieldId::SmokingStatus => &self.smoking_status,
            FieldId::AlcoholIntake => &self.alcohol_intake,
            FieldId::PhysicalActivity => &self.physical_activity,
            FieldId::EatsVegetables => &self.eats_vegetables,
            FieldId::EatsFruit => &self.eats_fruit,
            FieldId::HighSaltIntake => &self.high_salt_intake,
            FieldId::HighFatIntake => &self.high_fat_intake,
            FieldId::Weight => &self.weight,
            FieldId::Height => &self.height,
            FieldId::WaistCircumference => &self.waist_circumference,
            FieldId::SystolicBp => &self.systolic_bp,
            FieldId::DiastolicBp => &self.diastolic_bp,
            FieldId::FastingBloodSugar => &self.fasting_blood_sugar,
            FieldId::RandomBloodSugar => &self.random_blood_sugar,
            FieldId::TotalCholesterol => &self.total_cholesterol,
            FieldId::Hdl => &self.hdl,
            FieldId::Ldl => &self.ldl,
            FieldId::Triglycerides => &self.triglycerides,
            FieldId::UrineProtein => &self.urine_protein,
            FieldId::UrineKetones => &self.urine_ketones,
            FieldId::DmSymptom(_) => return None,
            FieldId::Medication(medication) => self.medications.slot(medication),
            FieldId::RiskLevel => &self.risk_level,
            FieldId::ManagementPlan => &self.management_plan,
            FieldId::LifestyleAdvice => &self.lifestyle_advice,
            FieldId::Referred => &self.referred,
            FieldId::ReferralReason => &self.referral_reason,
            FieldId::FollowUpDate => &self.follow_up_date,
            FieldId::AssessedBy => &self.assessed_by,
        };
        Some(value)
    }

    /// Read a checkbox field's current value. `None` for text fields.
    pub fn checked(&self, field: FieldId) -> Option<bool> {
        match field {
            FieldId::DmSymptom(symptom) => Some(*self.dm_symptoms.slot(symptom)),
            _ => None,
        }
    }

    fn text_slot_mut(&mut self, field: FieldId) -> Option<&mut String> {
        let slot = match field {
            FieldId::AssessmentDate => &mut self.assessment_date,
            FieldId::PatientName => &mut self.patient_name,
            FieldId::Age => &mut self.age,
            FieldId::Sex => &mut self.sex,
            FieldId::Birthdate => &mut self.birthdate,
            FieldId::CivilStatus => &mut self.civil_status,
            FieldId::ContactNumber => &mut self.contact_number,
            FieldId::Address => &mut self.address,
            FieldId::Occupation => &mut self.occupation,
            FieldId::ChestPain => &mut self.chest_pain,
            FieldId::DifficultyBreathing => &mut self.difficulty_breathing,
            FieldId::LossOfConsciousness => &mut self.loss_of_consciousness,
            FieldId::SlurredSpeech => &mut self.slurred_speech,
            FieldId::FacialAsymmetry => &mut self.facial_asymmetry,
            FieldId::WeaknessOfExtremity => &mut self.weakness_of_extremity,
            FieldId::Seizures => &mut self.seizures,
            FieldId::SevereHeadache => &mut self.severe_headache,
            FieldId::HistoryHypertension => &mut self.history_hypertension,
            FieldId::HistoryDiabetes => &mut self.history_diabetes,
            FieldId::HistoryCancer => &mut self.history_cancer,
            FieldId::HistoryStroke => &mut self.history_stroke,
            FieldId::HistoryAsthma => &mut self.history_asthma,
            FieldId::HistoryCopd => &mut self.history_copd,
            FieldId::HistoryHeartDisease => &mut self.history_heart_disease,
            FieldId::HistoryKidneyDisease => &mut self.history_kidney_disease,
            FieldId::FamilyHypertension => &mut self.family_hypertension,
            FieldId::FamilyDiabetes => &mut self.family_diabetes,
            FieldId::FamilyCancer => &mut self.family_cancer,
            FieldId::FamilyStroke => &mut self.family_stroke,
            FieldId::FamilyAsthma => &mut self.family_asthma,
            FieldId::FamilyCopd => &mut self.family_copd,
            FieldId::FamilyHeartDisease => &mut self.family_heart_disease,
            FieldId::FamilyKidneyDisease => &mut self.family_kidney_disease,
            FieldId::SmokingStatus => &mut self.smoking_status,
            FieldId::AlcoholIntake => &mut self.alcohol_intake,
            FieldId::PhysicalActivity => &mut self.physical_activity,
            FieldId::EatsVegetables => &mut self.eats_vegetables,
            FieldId::EatsFruit => &mut self.eats_fruit,
            FieldId::HighSaltIntake => &mut self.high_salt_intake,
            FieldId::HighFatIntake => &mut self.high_fat_intake,
            FieldId::Weight => &mut self.weight,
            FieldId::Height => &mut self.height,
            FieldId::WaistCircumference => &mut self.waist_circumference,
            FieldId::SystolicBp => &mut self.systolic_bp,
            FieldId::DiastolicBp => &mut self.diastolic_bp,
            FieldId::FastingBloodSugar => &mut self.fasting_blood_sugar,
            FieldId::RandomBloodSugar => &mut self.random_blood_sugar,
            FieldId::TotalCholesterol => &mut self.total_cholesterol,
            FieldId::Hdl => &mut self.hdl,
            FieldId::Ldl => &mut self.ldl,
            FieldId::Triglycerides => &mut self.triglycerides,
            FieldId::UrineProtein => &mut self.urine_protein,
            FieldId::UrineKetones => &mut self.urine_ketones,
            FieldId::DmSymptom(_) => return None,
            FieldId::Medication(medication) => self.medications.slot_mut(medication),
            FieldId::RiskLevel => &mut self.risk_level,
            FieldId::ManagementPlan => &mut self.management_plan,
            FieldId::LifestyleAdvice => &mut self.lifestyle_advice,
            FieldId::Referred => &mut self.referred,
            FieldId::ReferralReason => &mut self.referral_reason,
            FieldId::FollowUpDate => &mut self.follow_up_date,
            FieldId::AssessedBy => &mut self.assessed_by,
        };
        Some(slot)
    }

    /// Freeze the form into its JSON snapshot string.
    ///
    /// The snapshot always carries the full field set, including empty
    /// strings and unticked checkboxes.
    pub fn to_snapshot(&self) -> FormResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Rebuild a form from a stored snapshot string.
    pub fn from_snapshot(snapshot: &str) -> FormResult<Self> {
        Ok(serde_json::from_str(snapshot)?)
    }

    /// Rebuild a form from a stored snapshot JSON value.
    ///
    /// Backends are inconsistent about whether `form_data` comes back as a
    /// JSON object or as a JSON string containing the object; both shapes are
    /// accepted here.
    pub fn from_snapshot_value(snapshot: serde_json::Value) -> FormResult<Self> {
        match snapshot {
            serde_json::Value::String(inner) => Self::from_snapshot(&inner),
            value => Ok(serde_json::from_value(value)?),
        }
    }
}

impl DmSymptoms {
    fn slot(&self, symptom: DmSymptom) -> &bool {
        match symptom {
            DmSymptom::Polyuria => &self.polyuria,
            DmSymptom::Polydipsia => &self.polydipsia,
            DmSymptom::Polyphagia => &self.polyphagia,
            DmSymptom::WeightLoss => &self.weight_loss,
            DmSymptom::BlurredVision => &self.blurred_vision,
            DmSymptom::SlowWoundHealing => &self.slow_wound_healing,
            DmSymptom::Numbness => &self.numbness,
        }
    }

    fn slot_mut(&mut self, symptom: DmSymptom) -> &mut bool {
        match symptom {
            DmSymptom::Polyuria => &mut self.polyuria,
            DmSymptom::Polydipsia => &mut self.polydipsia,
            DmSymptom::Polyphagia => &mut self.polyphagia,
            DmSymptom::WeightLoss => &mut self.weight_loss,
            DmSymptom::BlurredVision => &mut self.blurred_vision,
            DmSymptom::SlowWoundHealing => &mut self.slow_wound_healing,
            DmSymptom::Numbness => &mut self.numbness,
        }
    }
}

impl Medications {
    fn slot(&self, medication: Medication) -> &String {
        match medication {
            Medication::Antihypertensive => &self.antihypertensive,
            Medication::OralHypoglycemic => &self.oral_hypoglycemic,
            Medication::Insulin => &self.insulin,
            Medication::LipidLowering => &self.lipid_lowering,
            Medication::Antiplatelet => &self.antiplatelet,
        }
    }

    fn slot_mut(&mut self, medication: Medication) -> &mut String {
        match medication {
            Medication::Antihypertensive => &mut self.antihypertensive,
            Medication::OralHypoglycemic => &mut self.oral_hypoglycemic,
            Medication::Insulin => &mut self.insulin,
            Medication::LipidLowering => &mut self.lipid_lowering,
            Medication::Antiplatelet => &mut self.antiplatelet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_field_stores_text_verbatim() {
        let mut form = AssessmentForm::default();
        form.set_field(FieldId::PatientName, FieldValue::text("Maria Santos"))
            .expect("set patient name");
        form.set_field(FieldId::Age, FieldValue::text("34"))
            .expect("set age");

        assert_eq!(form.patient_name, "Maria Santos");
        // Numeric-looking fields stay strings, no coercion.
        assert_eq!(form.age, "34");
    }

    #[test]
    fn set_field_stores_checkbox_booleans() {
        let mut form = AssessmentForm::default();
        form.set_field(
            FieldId::DmSymptom(DmSymptom::Polyuria),
            FieldValue::Checked(true),
        )
        .expect("tick polyuria");

        assert!(form.dm_symptoms.polyuria);
        assert!(!form.dm_symptoms.polydipsia);
    }

    #[test]
    fn set_field_rejects_mismatched_value_shapes() {
        let mut form = AssessmentForm::default();

        let err = form
            .set_field(FieldId::PatientName, FieldValue::Checked(true))
            .expect_err("boolean into text field");
        assert!(matches!(
            err,
            FormError::ValueType {
                field: "patientName",
                expected: "text"
            }
        ));

        let err = form
            .set_field(
                FieldId::DmSymptom(DmSymptom::Numbness),
                FieldValue::text("Yes"),
            )
            .expect_err("text into checkbox field");
        assert!(matches!(
            err,
            FormError::ValueType {
                field: "dmSymptoms.numbness",
                expected: "checkbox"
            }
        ));
    }

    #[test]
    fn editing_weight_or_height_recomputes_bmi() {
        let mut form = AssessmentForm::default();
        form.set_field(FieldId::Weight, FieldValue::text("70"))
            .expect("set weight");
        assert_eq!(form.bmi, "", "bmi absent until both inputs present");

        form.set_field(FieldId::Height, FieldValue::text("175"))
            .expect("set height");
        assert_eq!(form.bmi, "22.86");

        form.set_field(FieldId::Weight, FieldValue::text("not a number"))
            .expect("set weight to junk");
        assert_eq!(form.bmi, "", "bmi cleared when an input stops parsing");
    }

    #[test]
    fn medication_fields_hold_yes_no_strings() {
        let mut form = AssessmentForm::default();
        form.set_field(
            FieldId::Medication(Medication::Antihypertensive),
            FieldValue::text("Yes"),
        )
        .expect("set medication");

        assert_eq!(form.medications.antihypertensive, "Yes");
        assert_eq!(
            form.text(FieldId::Medication(Medication::Antihypertensive)),
            Some("Yes")
        );
    }

    #[test]
    fn snapshot_always_carries_the_full_shape() {
        let form = AssessmentForm::default();
        let snapshot = form.to_snapshot().expect("serialise default form");
        let value: serde_json::Value =
            serde_json::from_str(&snapshot).expect("snapshot is valid JSON");

        let object = value.as_object().expect("snapshot is an object");
        assert!(object.contains_key("patientName"));
        assert!(object.contains_key("bmi"));
        assert!(object.contains_key("dmSymptoms"));
        assert!(object.contains_key("medications"));
        assert_eq!(object["patientName"], "");
        assert_eq!(object["dmSymptoms"]["polyuria"], false);
    }

    #[test]
    fn snapshot_round_trips() {
        let mut form = AssessmentForm::default();
        form.set_field(FieldId::PatientName, FieldValue::text("Maria Santos"))
            .expect("set name");
        form.set_field(FieldId::Weight, FieldValue::text("70"))
            .expect("set weight");
        form.set_field(FieldId::Height, FieldValue::text("175"))
            .expect("set height");
        form.set_field(
            FieldId::DmSymptom(DmSymptom::BlurredVision),
            FieldValue::Checked(true),
        )
        .expect("tick symptom");

        let snapshot = form.to_snapshot().expect("serialise");
        let restored = AssessmentForm::from_snapshot(&snapshot).expect("deserialise");
        assert_eq!(form, restored);
    }

    #[test]
    fn snapshot_value_accepts_object_or_embedded_string() {
        let mut form = AssessmentForm::default();
        form.patient_name = "Maria Santos".into();

        let object = serde_json::to_value(&form).expect("to value");
        let from_object =
            AssessmentForm::from_snapshot_value(object).expect("from object value");
        assert_eq!(from_object.patient_name, "Maria Santos");

        let embedded =
            serde_json::Value::String(form.to_snapshot().expect("serialise"));
        let from_string =
            AssessmentForm::from_snapshot_value(embedded).expect("from string value");
        assert_eq!(from_string.patient_name, "Maria Santos");
    }

    #[test]
    fn snapshot_tolerates_missing_fields() {
        let form = AssessmentForm::from_snapshot(r#"{"patientName":"Jose Cruz"}"#)
            .expect("partial snapshot");
        assert_eq!(form.patient_name, "Jose Cruz");
        assert_eq!(form.age, "");
        assert!(!form.dm_symptoms.polyuria);
    }
}
