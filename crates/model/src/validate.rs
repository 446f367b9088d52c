//! Required-field validation.
//!
//! Only identity and contact fields are required; clinical and red-flag
//! fields are informational at this layer and never block submission.
//! Errors are kept in declaration order so the caller can focus the first
//! offending field on the page.

use crate::field::FieldId;
use crate::form::AssessmentForm;

/// The required fields, in the order they appear on the form.
pub const REQUIRED_FIELDS: [FieldId; 7] = [
    FieldId::PatientName,
    FieldId::Age,
    FieldId::Sex,
    FieldId::Birthdate,
    FieldId::CivilStatus,
    FieldId::ContactNumber,
    FieldId::Address,
];

/// Ordered field-to-message collection produced by [`validate`].
///
/// Recomputed on every submit attempt; individual entries are cleared as the
/// user edits the corresponding field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationErrors {
    entries: Vec<(FieldId, String)>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The first errored field in declaration order, the one the caller
    /// should scroll to.
    pub fn first(&self) -> Option<(FieldId, &str)> {
        self.entries
            .first()
            .map(|(field, message)| (*field, message.as_str()))
    }

    /// The message for one field, if it is in error.
    pub fn message_for(&self, field: FieldId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, message)| message.as_str())
    }

    /// Clear the error for one field, leaving every other entry untouched.
    pub fn clear(&mut self, field: FieldId) {
        self.entries.retain(|(candidate, _)| *candidate != field);
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &str)> {
        self.entries
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    fn push(&mut self, field: FieldId, message: String) {
        self.entries.push((field, message));
    }
}

/// Check the required-field allow-list against the current form state.
///
/// Success iff the returned collection is empty. Messages are derived from
/// the field's wire name, e.g. `patientName` yields
/// `"Patient Name is required"`.
pub fn validate(form: &AssessmentForm) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    for field in REQUIRED_FIELDS {
        let missing = form
            .text(field)
            .map_or(true, |value| value.trim().is_empty());
        if missing {
            errors.push(field, format!("{} is required", field.label()));
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldValue;

    fn populated_form() -> AssessmentForm {
        let mut form = AssessmentForm::default();
        for (field, value) in [
            (FieldId::PatientName, "Maria Santos"),
            (FieldId::Age, "34"),
            (FieldId::Sex, "Female"),
            (FieldId::Birthdate, "1990-05-01"),
            (FieldId::CivilStatus, "Married"),
            (FieldId::ContactNumber, "09171234567"),
            (FieldId::Address, "Quezon City"),
        ] {
            form.set_field(field, FieldValue::text(value))
                .expect("populate required field");
        }
        form
    }

    #[test]
    fn fully_populated_form_passes() {
        assert!(validate(&populated_form()).is_empty());
    }

    #[test]
    fn missing_patient_name_yields_exactly_one_error() {
        let mut form = populated_form();
        form.patient_name.clear();

        let errors = validate(&form);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.message_for(FieldId::PatientName),
            Some("Patient Name is required")
        );
    }

    #[test]
    fn clinical_fields_are_never_required() {
        let form = populated_form();
        // Red flags, histories and labs all left empty.
        assert!(validate(&form).is_empty());
    }

    #[test]
    fn errors_follow_declaration_order() {
        let mut form = populated_form();
        form.address.clear();
        form.age.clear();

        let errors = validate(&form);
        let fields: Vec<FieldId> = errors.iter().map(|(field, _)| field).collect();
        assert_eq!(fields, vec![FieldId::Age, FieldId::Address]);
        assert_eq!(
            errors.first().map(|(field, _)| field),
            Some(FieldId::Age)
        );
    }

    #[test]
    fn whitespace_only_values_count_as_missing() {
        let mut form = populated_form();
        form.contact_number = "   ".into();

        let errors = validate(&form);
        assert_eq!(
            errors.message_for(FieldId::ContactNumber),
            Some("Contact Number is required")
        );
    }

    #[test]
    fn clear_removes_only_the_named_field() {
        let mut form = populated_form();
        form.patient_name.clear();
        form.address.clear();

        let mut errors = validate(&form);
        assert_eq!(errors.len(), 2);

        errors.clear(FieldId::PatientName);
        assert_eq!(errors.len(), 1);
        assert!(errors.message_for(FieldId::PatientName).is_none());
        assert!(errors.message_for(FieldId::Address).is_some());
    }
}
