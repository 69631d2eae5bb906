//! Raw patient records as returned by the remote service
//!
//! The vital-sign fields are kept as untyped JSON values: the service mixes
//! numbers, numeric strings, nulls and garbage, and it is the field parser's
//! job (not deserialization's) to decide what is usable.

use super::ids::PatientId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One patient record, read-only input to classification
///
/// # Examples
///
/// ```
/// use vigil::domain::PatientRecord;
///
/// let record: PatientRecord = serde_json::from_value(serde_json::json!({
///     "patient_id": "DEMO001",
///     "blood_pressure": "120/80",
///     "temperature": 98.6,
///     "age": "45"
/// })).unwrap();
///
/// assert_eq!(record.patient_id().unwrap().as_str(), "DEMO001");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Identity key; expected to be a non-empty string
    #[serde(default)]
    pub patient_id: Value,

    /// Expected as `"<systolic>/<diastolic>"`
    #[serde(default)]
    pub blood_pressure: Value,

    /// Degrees Fahrenheit, number or numeric string
    #[serde(default)]
    pub temperature: Value,

    /// Years, number or numeric string
    #[serde(default)]
    pub age: Value,

    /// Fields not used for classification (name, diagnosis, medications, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PatientRecord {
    /// Returns the patient identifier if the record carries a usable one
    pub fn patient_id(&self) -> Option<PatientId> {
        self.patient_id
            .as_str()
            .and_then(|id| PatientId::new(id).ok())
    }
}
