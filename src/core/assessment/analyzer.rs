//! Batch analyzer
//!
//! Classifies a collection of patient records and partitions their
//! identifiers into the three reported result sets.

use super::classifier::classify;
use crate::domain::{PatientId, PatientRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identifiers per reported category
///
/// `BTreeSet` gives both de-duplication and the lexicographic output order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSets {
    pub high_risk: BTreeSet<PatientId>,
    pub fever: BTreeSet<PatientId>,
    pub data_quality_issues: BTreeSet<PatientId>,
}

impl ResultSets {
    pub fn is_empty(&self) -> bool {
        self.high_risk.is_empty() && self.fever.is_empty() && self.data_quality_issues.is_empty()
    }

    fn clear(&mut self) {
        self.high_risk.clear();
        self.fever.clear();
        self.data_quality_issues.clear();
    }
}

/// Statistics of one analysis pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Records handed to the analyzer
    pub total_patients: usize,

    /// Records classified without a data-quality issue
    pub patients_without_issues: usize,

    /// Unique IDs in the high-risk set
    pub high_risk_count: usize,

    /// Unique IDs in the fever set
    pub fever_count: usize,

    /// Records classified with a data-quality issue; duplicates of one ID each count
    pub data_quality_count: usize,

    /// Records with no usable `patient_id`; these land in no result set
    pub skipped_records: usize,

    /// Data-quality issues over total patients, as a percentage with two decimals
    pub data_quality_issue_rate: f64,
}

impl AnalysisSummary {
    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total_patients = self.total_patients,
            patients_without_issues = self.patients_without_issues,
            high_risk = self.high_risk_count,
            fever = self.fever_count,
            data_quality_issues = self.data_quality_count,
            skipped = self.skipped_records,
            data_quality_issue_rate = format!("{:.2}%", self.data_quality_issue_rate),
            "Analysis completed"
        );
    }
}

/// Analyzer owning the result sets of the current run
///
/// Every call to [`BatchAnalyzer::analyze`] starts from empty sets, so
/// repeated calls over the same input produce identical output.
///
/// # Example
///
/// ```
/// use vigil::core::assessment::BatchAnalyzer;
/// use vigil::domain::PatientRecord;
///
/// let patients: Vec<PatientRecord> = serde_json::from_value(serde_json::json!([
///     { "patient_id": "DEMO002", "blood_pressure": "150/95", "temperature": 101.5, "age": 70 },
///     { "patient_id": "DEMO001", "blood_pressure": "N/A", "temperature": 98.6, "age": 30 }
/// ])).unwrap();
///
/// let mut analyzer = BatchAnalyzer::new();
/// let results = analyzer.analyze(&patients);
/// assert_eq!(results.high_risk.len(), 1);
/// assert_eq!(results.data_quality_issues.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct BatchAnalyzer {
    results: ResultSets,
    summary: AnalysisSummary,
}

impl BatchAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies every record and rebuilds the result sets
    pub fn analyze(&mut self, patients: &[PatientRecord]) -> &ResultSets {
        self.results.clear();
        let mut patients_without_issues = 0;
        let mut records_with_issues = 0;
        let mut skipped_records = 0;

        for record in patients {
            let Some(patient_id) = record.patient_id() else {
                tracing::warn!(
                    patient_id = %record.patient_id,
                    "Skipping record without a usable patient_id"
                );
                skipped_records += 1;
                continue;
            };

            let outcome = classify(record);
            tracing::debug!(
                patient_id = %patient_id,
                total_score = outcome.total_score(),
                data_quality_issue = outcome.data_quality_issue,
                has_fever = outcome.has_fever,
                is_high_risk = outcome.is_high_risk,
                "Classified patient"
            );

            if outcome.data_quality_issue {
                records_with_issues += 1;
                self.results.data_quality_issues.insert(patient_id);
                continue;
            }

            patients_without_issues += 1;
            if outcome.has_fever {
                self.results.fever.insert(patient_id.clone());
            }
            if outcome.is_high_risk {
                self.results.high_risk.insert(patient_id);
            }
        }

        self.summary = AnalysisSummary {
            total_patients: patients.len(),
            patients_without_issues,
            high_risk_count: self.results.high_risk.len(),
            fever_count: self.results.fever.len(),
            data_quality_count: records_with_issues,
            skipped_records,
            data_quality_issue_rate: percentage(records_with_issues, patients.len()),
        };

        &self.results
    }

    /// Result sets of the last `analyze` call
    pub fn results(&self) -> &ResultSets {
        &self.results
    }

    /// Summary of the last `analyze` call
    pub fn summary(&self) -> &AnalysisSummary {
        &self.summary
    }

    /// Consumes the analyzer, returning its results and summary
    pub fn into_parts(self) -> (ResultSets, AnalysisSummary) {
        (self.results, self.summary)
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = part as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}
