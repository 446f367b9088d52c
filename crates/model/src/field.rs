//! Typed field addressing for the assessment form.
//!
//! Every editable field on the form is identified by a [`FieldId`] variant
//! rather than a stringly-typed path, so an invalid field reference cannot be
//! constructed. Nested groups (`dmSymptoms.*`, `medications.*`) get their own
//! sub-enums. The derived `bmi` field deliberately has no identifier: it can
//! only change through recomputation, never through a direct write.

/// Diabetes-symptom checkboxes, stored as booleans under `dmSymptoms`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DmSymptom {
    Polyuria,
    Polydipsia,
    Polyphagia,
    WeightLoss,
    BlurredVision,
    SlowWoundHealing,
    Numbness,
}

/// Current-medication selections, stored as Yes/No strings under
/// `medications`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Medication {
    Antihypertensive,
    OralHypoglycemic,
    Insulin,
    LipidLowering,
    Antiplatelet,
}

/// Identifier for one editable form field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldId {
    // Identity and encounter
    AssessmentDate,
    PatientName,
    Age,
    Sex,
    Birthdate,
    CivilStatus,
    ContactNumber,
    Address,
    Occupation,

    // Red flags (tri-state Yes/No/empty)
    ChestPain,
    DifficultyBreathing,
    LossOfConsciousness,
    SlurredSpeech,
    FacialAsymmetry,
    WeaknessOfExtremity,
    Seizures,
    SevereHeadache,

    // Past medical history (tri-state)
    HistoryHypertension,
    HistoryDiabetes,
    HistoryCancer,
    HistoryStroke,
    HistoryAsthma,
    HistoryCopd,
    HistoryHeartDisease,
    HistoryKidneyDisease,

    // Family history (tri-state)
    FamilyHypertension,
    FamilyDiabetes,
    FamilyCancer,
    FamilyStroke,
    FamilyAsthma,
    FamilyCopd,
    FamilyHeartDisease,
    FamilyKidneyDisease,

    // Lifestyle and risk factors
    SmokingStatus,
    AlcoholIntake,
    PhysicalActivity,
    EatsVegetables,
    EatsFruit,
    HighSaltIntake,
    HighFatIntake,

    // Anthropometrics and vitals (`bmi` is derived, not addressable)
    Weight,
    Height,
    WaistCircumference,
    SystolicBp,
    DiastolicBp,

    // Laboratory results
    FastingBloodSugar,
    RandomBloodSugar,
    TotalCholesterol,
    Hdl,
    Ldl,
    Triglycerides,
    UrineProtein,
    UrineKetones,

    // Nested groups
    DmSymptom(DmSymptom),
    Medication(Medication),

    // Management and follow-up
    RiskLevel,
    ManagementPlan,
    LifestyleAdvice,
    Referred,
    ReferralReason,
    FollowUpDate,
    AssessedBy,
}

/// A value being written to a field.
///
/// Checkbox inputs carry booleans; every other input carries its raw string,
/// including numeric-looking fields (no numeric coercion at this layer).
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    Checked(bool),
}

impl FieldValue {
    /// Convenience constructor for text values.
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }
}

impl DmSymptom {
    fn wire_name(self) -> &'static str {
        match self {
            DmSymptom::Polyuria => "dmSymptoms.polyuria",
            DmSymptom::Polydipsia => "dmSymptoms.polydipsia",
            DmSymptom::Polyphagia => "dmSymptoms.polyphagia",
            DmSymptom::WeightLoss => "dmSymptoms.weightLoss",
            DmSymptom::BlurredVision => "dmSymptoms.blurredVision",
            DmSymptom::SlowWoundHealing => "dmSymptoms.slowWoundHealing",
            DmSymptom::Numbness => "dmSymptoms.numbness",
        }
    }
}

impl Medication {
    fn wire_name(self) -> &'static str {
        match self {
            Medication::Antihypertensive => "medications.antihypertensive",
            Medication::OralHypoglycemic => "medications.oralHypoglycemic",
            Medication::Insulin => "medications.insulin",
            Medication::LipidLowering => "medications.lipidLowering",
            Medication::Antiplatelet => "medications.antiplatelet",
        }
    }
}

impl FieldId {
    /// The field's name on the wire: camelCase, dotted for nested groups.
    ///
    /// Matches the key used in the JSON snapshot (for nested fields, the
    /// dotted form `parent.child`).
    pub fn wire_name(self) -> &'static str {
        match self {
            FieldId::AssessmentDate => "assessmentDate",
            FieldId::PatientName => "patientName",
            FieldId::Age => "age",
            FieldId::Sex => "sex",
            FieldId::Birthdate => "birthdate",
            FieldId::CivilStatus => "civilStatus",
            FieldId::ContactNumber => "contactNumber",
            FieldId::Address => "address",
            FieldId::Occupation => "occupation",
            FieldId::ChestPain => "chestPain",
            FieldId::DifficultyBreathing => "difficultyBreathing",
            FieldId::LossOfConsciousness => "lossOfConsciousness",
            FieldId::SlurredSpeech => "slurredSpeech",
            FieldId::FacialAsymmetry => "facialAsymmetry",
            FieldId::WeaknessOfExtremity => "weaknessOfExtremity",
            FieldId::Seizures => "seizures",
            FieldId::SevereHeadache => "severeHeadache",
            FieldId::HistoryHypertension => "historyHypertension",
            FieldId::HistoryDiabetes => "historyDiabetes",
            FieldId::HistoryCancer => "historyCancer",
            FieldId::HistoryStroke => "historyStroke",
            FieldId::HistoryAsthma => "historyAsthma",
            FieldId::HistoryCopd => "historyCopd",
            FieldId::HistoryHeartDisease => "historyHeartDisease",
            FieldId::HistoryKidneyDisease => "historyKidneyDisease",
            FieldId::FamilyHypertension => "familyHypertension",
            FieldId::FamilyDiabetes => "familyDiabetes",
            FieldId::FamilyCancer => "familyCancer",
            FieldId::FamilyStroke => "familyStroke",
            FieldId::FamilyAsthma => "familyAsthma",
            FieldId::FamilyCopd => "familyCopd",
            FieldId::FamilyHeartDisease => "familyHeartDisease",
            FieldId::FamilyKidneyDisease => "familyKidneyDisease",
            FieldId::SmokingStatus => "smokingStatus",
            FieldId::AlcoholIntake => "alcoholIntake",
            FieldId::PhysicalActivity => "physicalActivity",
            FieldId::EatsVegetables => "eatsVegetables",
            FieldId::EatsFruit => "eatsFruit",
            FieldId::HighSaltIntake => "highSaltIntake",
            FieldId::HighFatIntake => "highFatIntake",
            FieldId::Weight => "weight",
            FieldId::Height => "height",
            FieldId::WaistCircumference => "waistCircumference",
            FieldId::SystolicBp => "systolicBp",
            FieldId::DiastolicBp => "diastolicBp",
            FieldId::FastingBloodSugar => "fastingBloodSugar",
            FieldId::RandomBloodSugar => "randomBloodSugar",
            FieldId::TotalCholesterol => "totalCholesterol",
            FieldId::Hdl => "hdl",
            FieldId::Ldl => "ldl",
            FieldId::Triglycerides => "triglycerides",
            FieldId::UrineProtein => "urineProtein",
            FieldId::UrineKetones => "urineKetones",
            FieldId::DmSymptom(symptom) => symptom.wire_name(),
            FieldId::Medication(medication) => medication.wire_name(),
            FieldId::RiskLevel => "riskLevel",
            FieldId::ManagementPlan => "managementPlan",
            FieldId::LifestyleAdvice => "lifestyleAdvice",
            FieldId::Referred => "referred",
            FieldId::ReferralReason => "referralReason",
            FieldId::FollowUpDate => "followUpDate",
            FieldId::AssessedBy => "assessedBy",
        }
    }

    /// Human-readable label derived from the wire name.
    ///
    /// Splits the camelCase leaf name into spaced, capitalised words, e.g.
    /// `patientName` becomes `Patient Name`. Used for validation messages.
    pub fn label(self) -> String {
        let leaf = self
            .wire_name()
            .rsplit('.')
            .next()
            .unwrap_or_default();
        label_from_wire(leaf)
    }
}

fn label_from_wire(name: &str) -> String {
    let mut label = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if i == 0 {
            label.extend(ch.to_uppercase());
        } else {
            if ch.is_ascii_uppercase() {
                label.push(' ');
            }
            label.push(ch);
        }
    }
    label
}
