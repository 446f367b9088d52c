//! Printable-document support.
//!
//! The engine builds the HTML for the printable assessment and hands it to
//! an external renderer through [`DocumentRenderer`]; the HTML-to-PDF
//! conversion itself is an external collaborator and is out of scope here.

use riskform_model::AssessmentForm;

/// Seam to the external HTML-to-PDF renderer.
///
/// Rendering is synchronous from the caller's perspective: the save flow
/// waits for the bytes before building the upload.
pub trait DocumentRenderer: Send + Sync {
    /// Render the populated HTML into document bytes.
    fn render(&self, html: &str) -> Result<Vec<u8>, RenderError>;
}

/// Failure reported by the external document renderer.
#[derive(Debug, thiserror::Error)]
#[error("document rendering failed: {0}")]
pub struct RenderError(pub String);

/// A rendered document ready for upload.
#[derive(Clone, Debug)]
pub struct DocumentArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// File name for a risk-assessment document.
pub fn assessment_file_name(patient_id: &str) -> String {
    format!("risk_assessment_{patient_id}.pdf")
}

/// File name for the patient-view medical-record export.
pub fn medical_record_file_name(patient_name: &str) -> String {
    format!("{patient_name}_medical_record.pdf")
}

/// Populate the fixed printable template with the form's field values.
pub fn render_html(form: &AssessmentForm) -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <style>\n\
         body { font-family: Arial, sans-serif; font-size: 12px; margin: 24px; }\n\
         h1 { font-size: 18px; text-align: center; }\n\
         h2 { font-size: 14px; border-bottom: 1px solid #444; margin-top: 18px; }\n\
         table { width: 100%; border-collapse: collapse; }\n\
         td { padding: 2px 6px; vertical-align: top; }\n\
         td.label { width: 40%; color: #333; }\n\
         </style>\n</head>\n<body>\n\
         <h1>Risk Assessment Form</h1>\n",
    );

    section(&mut html, "Patient Information", &[
        ("Assessment Date", &form.assessment_date),
        ("Patient Name", &form.patient_name),
        ("Age", &form.age),
        ("Sex", &form.sex),
        ("Birthdate", &form.birthdate),
        ("Civil Status", &form.civil_status),
        ("Contact Number", &form.contact_number),
        ("Address", &form.address),
        ("Occupation", &form.occupation),
    ]);

    section(&mut html, "Red Flags", &[
        ("Chest Pain", &form.chest_pain),
        ("Difficulty Breathing", &form.difficulty_breathing),
        ("Loss of Consciousness", &form.loss_of_consciousness),
        ("Slurred Speech", &form.slurred_speech),
        ("Facial Asymmetry", &form.facial_asymmetry),
        ("Weakness of Extremity", &form.weakness_of_extremity),
        ("Seizures", &form.seizures),
        ("Severe Headache", &form.severe_headache),
    ]);

    section(&mut html, "Past Medical History", &[
        ("Hypertension", &form.history_hypertension),
        ("Diabetes", &form.history_diabetes),
        ("Cancer", &form.history_cancer),
        ("Stroke", &form.history_stroke),
        ("Asthma", &form.history_asthma),
        ("COPD", &form.history_copd),
        ("Heart Disease", &form.history_heart_disease),
        ("Kidney Disease", &form.history_kidney_disease),
    ]);

    section(&mut html, "Family History", &[
        ("Hypertension", &form.family_hypertension),
        ("Diabetes", &form.family_diabetes),
        ("Cancer", &form.family_cancer),
        ("Stroke", &form.family_stroke),
        ("Asthma", &form.family_asthma),
        ("COPD", &form.family_copd),
        ("Heart Disease", &form.family_heart_disease),
        ("Kidney Disease", &form.family_kidney_disease),
    ]);

    section(&mut html, "Lifestyle and Risk Factors", &[
        ("Smoking Status", &form.smoking_status),
        ("Alcohol Intake", &form.alcohol_intake),
        ("Physical Activity", &form.physical_activity),
        ("Eats Vegetables", &form.eats_vegetables),
        ("Eats Fruit", &form.eats_fruit),
        ("High Salt Intake", &form.high_salt_intake),
        ("High Fat Intake", &form.high_fat_intake),
    ]);

    section(&mut html, "Measurements", &[
        ("Weight (kg)", &form.weight),
        ("Height (cm)", &form.height),
        ("BMI", &form.bmi),
        ("Waist Circumference (cm)", &form.waist_circumference),
        ("Systolic BP", &form.systolic_bp),
        ("Diastolic BP", &form.diastolic_bp),
    ]);

    section(&mut html, "Laboratory Results", &[
        ("Fasting Blood Sugar", &form.fasting_blood_sugar),
        ("Random Blood Sugar", &form.random_blood_sugar),
        ("Total Cholesterol", &form.total_cholesterol),
        ("HDL", &form.hdl),
        ("LDL", &form.ldl),
        ("Triglycerides", &form.triglycerides),
        ("Urine Protein", &form.urine_protein),
        ("Urine Ketones", &form.urine_ketones),
    ]);

    let yes_no = |checked: bool| if checked { "Yes" } else { "" };
    section(&mut html, "Symptoms of Diabetes", &[
        ("Polyuria", yes_no(form.dm_symptoms.polyuria)),
        ("Polydipsia", yes_no(form.dm_symptoms.polydipsia)),
        ("Polyphagia", yes_no(form.dm_symptoms.polyphagia)),
        ("Weight Loss", yes_no(form.dm_symptoms.weight_loss)),
        ("Blurred Vision", yes_no(form.dm_symptoms.blurred_vision)),
        ("Slow Wound Healing", yes_no(form.dm_symptoms.slow_wound_healing)),
        ("Numbness", yes_no(form.dm_symptoms.numbness)),
    ]);

    section(&mut html, "Current Medications", &[
        ("Antihypertensive", &form.medications.antihypertensive),
        ("Oral Hypoglycemic", &form.medications.oral_hypoglycemic),
        ("Insulin", &form.medications.insulin),
        ("Lipid Lowering", &form.medications.lipid_lowering),
        ("Antiplatelet", &form.medications.antiplatelet),
    ]);

    section(&mut html, "Management and Follow-up", &[
        ("Risk Level", &form.risk_level),
        ("Management Plan", &form.management_plan),
        ("Lifestyle Advice", &form.lifestyle_advice),
        ("Referred", &form.referred),
        ("Referral Reason", &form.referral_reason),
        ("Follow-up Date", &form.follow_up_date),
        ("Assessed By", &form.assessed_by),
    ]);

    html.push_str("</body>\n</html>\n");
    html
}

fn section(html: &mut String, title: &str, rows: &[(&str, &str)]) {
    html.push_str("<h2>");
    html.push_str(&escape_html(title));
    html.push_str("</h2>\n<table>\n");
    for (label, value) in rows {
        html.push_str("<tr><td class=\"label\">");
        html.push_str(&escape_html(label));
        html.push_str("</td><td>");
        html.push_str(&escape_html(value));
        html.push_str("</td></tr>\n");
    }
    html.push_str("</table>\n");
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_follow_the_backend_conventions() {
        assert_eq!(assessment_file_name("p1"), "risk_assessment_p1.pdf");
        assert_eq!(
            medical_record_file_name("Maria Santos"),
            "Maria Santos_medical_record.pdf"
        );
    }

    #[test]
    fn rendered_html_carries_form_values() {
        let mut form = AssessmentForm::default();
        form.patient_name = "Maria Santos".into();
        form.bmi = "22.86".into();
        form.dm_symptoms.polyuria = true;

        let html = render_html(&form);
        assert!(html.contains("Risk Assessment Form"));
        assert!(html.contains("Maria Santos"));
        assert!(html.contains("22.86"));
        assert!(html.contains("<td class=\"label\">Polyuria</td><td>Yes</td>"));
    }

    #[test]
    fn rendered_html_escapes_markup_in_values() {
        let mut form = AssessmentForm::default();
        form.patient_name = "<script>alert(1)</script>".into();

        let html = render_html(&form);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }
}
