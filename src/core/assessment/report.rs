//! Assessment run report

use super::analyzer::{AnalysisSummary, ResultSets};
use crate::adapters::patients::SubmissionResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Everything one assessment run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub dry_run: bool,
    pub summary: AnalysisSummary,
    pub results: ResultSets,

    /// Present unless the run was a dry run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission: Option<SubmissionResponse>,
}

impl AssessmentReport {
    pub fn duration(&self) -> chrono::Duration {
        self.completed_at - self.started_at
    }

    pub fn was_submitted(&self) -> bool {
        self.submission.is_some()
    }

    /// Writes the report as pretty-printed JSON
    pub fn write_json(&self, path: impl AsRef<std::path::Path>) -> crate::domain::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
