//! Derived growth metrics.
//!
//! Pure date and body-mass calculations shared by the measurement history,
//! the assessment workflow and the class report. Nothing here touches state.

use chrono::{Datelike, NaiveDate};

/// Minimum age in months at which BMI is recorded for a measurement.
pub const BMI_MIN_AGE_MONTHS: u32 = 70;

/// Storage format for every calendar date.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Display format for dates shown to teachers and parents.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Whole months between `dob` and `on_date`, using only the year and month
/// components. Results below zero clamp to zero.
///
/// A child born on the 28th and measured on the 1st of the next month counts
/// as one month old.
pub fn age_in_months(dob: NaiveDate, on_date: NaiveDate) -> u32 {
    let years = on_date.year() - dob.year();
    let months = on_date.month() as i32 - dob.month() as i32;
    let total = years * 12 + months;
    total.max(0) as u32
}

/// Body-mass index rounded to two decimals, or `None` when the height is not positive.
pub fn bmi(height_cm: f64, weight_kg: f64) -> Option<f64> {
    if height_cm <= 0.0 || !height_cm.is_finite() {
        return None;
    }
    let height_m = height_cm / 100.0;
    let value = weight_kg / (height_m * height_m);
    Some((value * 100.0).round() / 100.0)
}

/// Whether BMI applies to a child of the given age.
pub fn bmi_applies(age_months: u32) -> bool {
    age_months >= BMI_MIN_AGE_MONTHS
}

/// Parse a stored `YYYY-MM-DD` date.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT).ok()
}

/// Render a date in its stored `YYYY-MM-DD` form.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Render a date as `DD/MM/YYYY` for display.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Render a stored ISO date for display; `None` when it cannot be parsed.
pub fn format_display_iso(value: &str) -> Option<String> {
    parse_iso_date(value).map(format_display_date)
}
