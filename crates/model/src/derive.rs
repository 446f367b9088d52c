//! Derived-field calculation.
//!
//! Pure scalar derivations. Inputs arrive as the raw strings held by the
//! form; an absent or non-numeric input yields an absent result rather than
//! an error.

use chrono::NaiveDate;

/// Compute body-mass index from weight in kilograms and height in
/// centimetres, formatted to two decimal places.
///
/// Returns `None` when either input is missing or non-numeric, or when the
/// height is not positive.
pub fn compute_bmi(weight_kg: &str, height_cm: &str) -> Option<String> {
    let weight: f64 = weight_kg.trim().parse().ok()?;
    let height: f64 = height_cm.trim().parse().ok()?;
    if !weight.is_finite() || !height.is_finite() || height <= 0.0 {
        return None;
    }

    let height_m = height / 100.0;
    Some(format!("{:.2}", weight / (height_m * height_m)))
}

/// Compute age in whole years from a `YYYY-MM-DD` birthdate.
///
/// Returns `None` for an unparseable birthdate or one in the future.
pub fn compute_age(birthdate: &str, today: NaiveDate) -> Option<String> {
    let birth = NaiveDate::parse_from_str(birthdate.trim(), "%Y-%m-%d").ok()?;
    let years = today.years_since(birth)?;
    Some(years.to_string())
}
