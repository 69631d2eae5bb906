//! Risk classifier
//!
//! Pure scoring functions over parsed vitals. Each factor is scored only when
//! its reading is valid; an invalid reading contributes zero.
//!
//! | Factor         | Band                                   | Score |
//! |----------------|----------------------------------------|-------|
//! | Blood pressure | Stage 2: S ≥ 140 or D ≥ 90             | 4     |
//! |                | Stage 1: S 130–139 or D 80–89          | 3     |
//! |                | Elevated: S 120–129 and D < 80         | 2     |
//! |                | Normal: S < 120 and D < 80 (fallback)  | 1     |
//! | Temperature    | ≥ 101.0 °F                             | 2     |
//! |                | 99.6–100.9 °F                          | 1     |
//! |                | ≤ 99.5 °F                              | 0     |
//! | Age            | > 65                                   | 2     |
//! |                | ≤ 65                                   | 1     |

use super::parser::{AgeReading, BloodPressureReading, ParsedVitals, TemperatureReading, Vital};
use crate::domain::PatientRecord;
use serde::{Deserialize, Serialize};

/// Temperature at or above which a valid reading counts as fever
pub const FEVER_THRESHOLD_F: f64 = 99.6;

/// Temperature at or above which a fever is scored as high
pub const HIGH_FEVER_THRESHOLD_F: f64 = 101.0;

/// Total score at or above which a patient is high risk
pub const HIGH_RISK_THRESHOLD: u8 = 4;

/// Blood pressure band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BloodPressureCategory {
    Normal,
    Elevated,
    Stage1,
    Stage2,
}

impl BloodPressureCategory {
    /// Classifies a valid reading, most severe band first
    ///
    /// Readings that match none of the four bands (for example a systolic
    /// between 139 and 140) land in `Normal`.
    pub fn from_reading(reading: &BloodPressureReading) -> Self {
        let BloodPressureReading {
            systolic,
            diastolic,
        } = *reading;

        if systolic >= 140.0 || diastolic >= 90.0 {
            Self::Stage2
        } else if (130.0..=139.0).contains(&systolic) || (80.0..=89.0).contains(&diastolic) {
            Self::Stage1
        } else if (120.0..=129.0).contains(&systolic) && diastolic < 80.0 {
            Self::Elevated
        } else {
            Self::Normal
        }
    }

    pub fn score(self) -> u8 {
        match self {
            Self::Normal => 1,
            Self::Elevated => 2,
            Self::Stage1 => 3,
            Self::Stage2 => 4,
        }
    }
}

/// Temperature band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureCategory {
    Normal,
    LowFever,
    HighFever,
}

impl TemperatureCategory {
    pub fn from_reading(reading: &TemperatureReading) -> Self {
        if reading.value >= HIGH_FEVER_THRESHOLD_F {
            Self::HighFever
        } else if reading.value >= FEVER_THRESHOLD_F {
            Self::LowFever
        } else {
            Self::Normal
        }
    }

    pub fn score(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::LowFever => 1,
            Self::HighFever => 2,
        }
    }
}

/// Age band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeCategory {
    Under40,
    From40To65,
    Over65,
}

impl AgeCategory {
    pub fn from_reading(reading: &AgeReading) -> Self {
        if reading.value > 65.0 {
            Self::Over65
        } else if reading.value >= 40.0 {
            Self::From40To65
        } else {
            Self::Under40
        }
    }

    /// Under 40 and 40–65 score the same; only over 65 is differentiated
    pub fn score(self) -> u8 {
        match self {
            Self::Under40 | Self::From40To65 => 1,
            Self::Over65 => 2,
        }
    }
}

pub fn blood_pressure_score(vital: &Vital<BloodPressureReading>) -> u8 {
    vital
        .reading()
        .map_or(0, |r| BloodPressureCategory::from_reading(r).score())
}

pub fn temperature_score(vital: &Vital<TemperatureReading>) -> u8 {
    vital
        .reading()
        .map_or(0, |r| TemperatureCategory::from_reading(r).score())
}

pub fn age_score(vital: &Vital<AgeReading>) -> u8 {
    vital
        .reading()
        .map_or(0, |r| AgeCategory::from_reading(r).score())
}

/// True if at least one vital failed to parse, regardless of scores
pub fn has_data_quality_issues(vitals: &ParsedVitals) -> bool {
    vitals.has_invalid_field()
}

/// True only for a valid reading at or above [`FEVER_THRESHOLD_F`]
///
/// Independent of the other fields: a patient with a malformed blood
/// pressure can still have a fever.
pub fn has_fever(temperature: &Vital<TemperatureReading>) -> bool {
    temperature
        .reading()
        .is_some_and(|t| t.value >= FEVER_THRESHOLD_F)
}

pub fn is_high_risk(total_score: u8) -> bool {
    total_score >= HIGH_RISK_THRESHOLD
}

/// Per-factor scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskScore {
    pub blood_pressure: u8,
    pub temperature: u8,
    pub age: u8,
}

impl RiskScore {
    pub fn from_vitals(vitals: &ParsedVitals) -> Self {
        Self {
            blood_pressure: blood_pressure_score(&vitals.blood_pressure),
            temperature: temperature_score(&vitals.temperature),
            age: age_score(&vitals.age),
        }
    }

    pub fn total(&self) -> u8 {
        self.blood_pressure + self.temperature + self.age
    }
}

/// Classification outcome for one patient
///
/// The three flags are computed independently. Callers deciding result-set
/// membership must ignore `has_fever` and `is_high_risk` whenever
/// `data_quality_issue` is set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub vitals: ParsedVitals,
    pub score: RiskScore,
    pub data_quality_issue: bool,
    pub has_fever: bool,
    pub is_high_risk: bool,
}

impl Classification {
    pub fn from_vitals(vitals: ParsedVitals) -> Self {
        let score = RiskScore::from_vitals(&vitals);
        Self {
            vitals,
            score,
            data_quality_issue: has_data_quality_issues(&vitals),
            has_fever: has_fever(&vitals.temperature),
            is_high_risk: is_high_risk(score.total()),
        }
    }

    pub fn total_score(&self) -> u8 {
        self.score.total()
    }
}

/// Parses and classifies a raw record
///
/// # Examples
///
/// ```
/// use vigil::core::assessment::classify;
/// use vigil::domain::PatientRecord;
///
/// let record: PatientRecord = serde_json::from_value(serde_json::json!({
///     "patient_id": "DEMO007",
///     "blood_pressure": "160/100",
///     "temperature": "103.0",
///     "age": 75
/// })).unwrap();
///
/// let outcome = classify(&record);
/// assert_eq!(outcome.total_score(), 8);
/// assert!(outcome.is_high_risk);
/// assert!(outcome.has_fever);
/// ```
pub fn classify(record: &PatientRecord) -> Classification {
    Classification::from_vitals(ParsedVitals::from_record(record))
}
