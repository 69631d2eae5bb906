//! Field parser for raw vital signs
//!
//! Turns the heterogeneous JSON values found in patient records into typed
//! readings. Parsing is total: every input maps to either [`Vital::Valid`] or
//! [`Vital::Invalid`], and numeric input parses to the same value as the
//! equivalent numeric string (`98.6` and `"98.6"` are indistinguishable
//! afterwards).

use crate::domain::PatientRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upper bound (inclusive) for a plausible body temperature in °F
pub const MAX_TEMPERATURE_F: f64 = 120.0;

/// Upper bound (inclusive) for a plausible age in years
pub const MAX_AGE_YEARS: f64 = 150.0;

/// Outcome of parsing one field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reading", rename_all = "lowercase")]
pub enum Vital<T> {
    /// The field parsed and passed range checks
    Valid(T),
    /// The field was missing, malformed or out of range
    Invalid,
}

impl<T> Vital<T> {
    /// Returns true if the field parsed successfully
    pub fn is_valid(&self) -> bool {
        matches!(self, Vital::Valid(_))
    }

    /// Returns true if the field failed to parse
    pub fn is_invalid(&self) -> bool {
        !self.is_valid()
    }

    /// Returns the reading, if any
    pub fn reading(&self) -> Option<&T> {
        match self {
            Vital::Valid(reading) => Some(reading),
            Vital::Invalid => None,
        }
    }

    /// Maps a valid reading, leaving `Invalid` untouched
    pub fn map<U, F: FnOnce(&T) -> U>(&self, f: F) -> Vital<U> {
        match self {
            Vital::Valid(reading) => Vital::Valid(f(reading)),
            Vital::Invalid => Vital::Invalid,
        }
    }
}

impl<T> From<Option<T>> for Vital<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(reading) => Vital::Valid(reading),
            None => Vital::Invalid,
        }
    }
}

/// Blood pressure in mmHg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BloodPressureReading {
    pub systolic: f64,
    pub diastolic: f64,
}

/// Body temperature in °F
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub value: f64,
}

/// Age in years
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeReading {
    pub value: f64,
}

/// All three vitals of one patient record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParsedVitals {
    pub blood_pressure: Vital<BloodPressureReading>,
    pub temperature: Vital<TemperatureReading>,
    pub age: Vital<AgeReading>,
}

impl ParsedVitals {
    /// Parses the vital-sign fields of a raw record
    pub fn from_record(record: &PatientRecord) -> Self {
        Self {
            blood_pressure: parse_blood_pressure(&record.blood_pressure),
            temperature: parse_temperature(&record.temperature),
            age: parse_age(&record.age),
        }
    }

    /// True if at least one field failed to parse
    pub fn has_invalid_field(&self) -> bool {
        self.blood_pressure.is_invalid() || self.temperature.is_invalid() || self.age.is_invalid()
    }
}

/// Parses a `"<systolic>/<diastolic>"` string
///
/// Both segments must be decimal numbers strictly greater than zero.
///
/// # Examples
///
/// ```
/// use vigil::core::assessment::parser::{parse_blood_pressure, Vital};
/// use serde_json::json;
///
/// assert!(parse_blood_pressure(&json!("120/80")).is_valid());
/// assert_eq!(parse_blood_pressure(&json!("150/")), Vital::Invalid);
/// assert_eq!(parse_blood_pressure(&json!(120)), Vital::Invalid);
/// ```
pub fn parse_blood_pressure(value: &Value) -> Vital<BloodPressureReading> {
    let Some(text) = value.as_str().and_then(meaningful_str) else {
        return Vital::Invalid;
    };

    let mut segments = text.split('/');
    let (Some(systolic), Some(diastolic), None) =
        (segments.next(), segments.next(), segments.next())
    else {
        return Vital::Invalid;
    };

    match (parse_decimal(systolic), parse_decimal(diastolic)) {
        (Some(systolic), Some(diastolic)) if systolic > 0.0 && diastolic > 0.0 => {
            Vital::Valid(BloodPressureReading {
                systolic,
                diastolic,
            })
        }
        _ => Vital::Invalid,
    }
}

/// Parses a temperature in °F; valid range is `(0, 120]`
pub fn parse_temperature(value: &Value) -> Vital<TemperatureReading> {
    parse_bounded(value, MAX_TEMPERATURE_F)
        .map(|value| TemperatureReading { value })
        .into()
}

/// Parses an age in years; valid range is `(0, 150]`
pub fn parse_age(value: &Value) -> Vital<AgeReading> {
    parse_bounded(value, MAX_AGE_YEARS)
        .map(|value| AgeReading { value })
        .into()
}

/// Number or numeric string within `(0, max]`
fn parse_bounded(value: &Value, max: f64) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => meaningful_str(s).and_then(parse_decimal),
        _ => None,
    }?;

    (number > 0.0 && number <= max).then_some(number)
}

/// Filters out empty strings and the literal placeholders upstream
/// systems emit for missing values
fn meaningful_str(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    match trimmed {
        "" | "null" | "undefined" => None,
        other => Some(other),
    }
}

fn parse_decimal(segment: &str) -> Option<f64> {
    let segment = segment.trim();
    if segment.is_empty() {
        return None;
    }
    segment.parse::<f64>().ok().filter(|v| v.is_finite())
}
