//! Patient API wire models
//!
//! Request and response bodies exchanged with the assessment service.

use crate::core::assessment::ResultSets;
use crate::domain::{PatientId, PatientRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// One page of `GET /patients`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientPage {
    /// Records on this page
    pub data: Vec<PatientRecord>,

    /// Pagination metadata; absent means this is the last page
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl PatientPage {
    /// True if the server reports another page after this one
    pub fn has_next(&self) -> bool {
        self.pagination.as_ref().is_some_and(|p| p.has_next)
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub page: Option<u32>,

    #[serde(default)]
    pub limit: Option<u32>,

    #[serde(default)]
    pub total: Option<u32>,

    #[serde(default)]
    pub total_pages: Option<u32>,

    pub has_next: bool,

    #[serde(default)]
    pub has_previous: Option<bool>,
}

/// Body of `POST /submit-assessment`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub high_risk_patients: Vec<String>,
    pub fever_patients: Vec<String>,
    pub data_quality_issues: Vec<String>,
}

impl SubmissionPayload {
    /// Builds the payload from individual sets; an absent set is sent as `[]`
    pub fn from_parts(
        high_risk: Option<&BTreeSet<PatientId>>,
        fever: Option<&BTreeSet<PatientId>>,
        data_quality_issues: Option<&BTreeSet<PatientId>>,
    ) -> Self {
        fn to_vec(set: Option<&BTreeSet<PatientId>>) -> Vec<String> {
            set.map(|ids| ids.iter().map(|id| id.as_str().to_string()).collect())
                .unwrap_or_default()
        }

        Self {
            high_risk_patients: to_vec(high_risk),
            fever_patients: to_vec(fever),
            data_quality_issues: to_vec(data_quality_issues),
        }
    }
}

impl From<&ResultSets> for SubmissionPayload {
    fn from(results: &ResultSets) -> Self {
        Self::from_parts(
            Some(&results.high_risk),
            Some(&results.fever),
            Some(&results.data_quality_issues),
        )
    }
}

/// Response of the submit endpoint
///
/// The shape is owned by the service and only displayed. Accessors look in
/// a nested `results` object first, then at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionResponse(pub Value);

impl SubmissionResponse {
    fn field(&self, name: &str) -> Option<&Value> {
        self.0
            .get("results")
            .and_then(|r| r.get(name))
            .or_else(|| self.0.get(name))
    }

    pub fn score(&self) -> Option<f64> {
        self.field("score").and_then(Value::as_f64)
    }

    pub fn percentage(&self) -> Option<f64> {
        self.field("percentage").and_then(Value::as_f64)
    }

    pub fn status(&self) -> Option<&str> {
        self.field("status").and_then(Value::as_str)
    }

    pub fn breakdown(&self) -> Option<&Value> {
        self.field("breakdown")
    }

    pub fn feedback(&self) -> Option<&Value> {
        self.field("feedback")
    }

    pub fn message(&self) -> Option<&str> {
        self.0.get("message").and_then(Value::as_str)
    }
}
