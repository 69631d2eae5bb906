//! Submission adapter
//!
//! Reshapes analyzer output into the submit payload and sends it through
//! the fetcher's retrying request primitive.

use super::fetcher::ResilientFetcher;
use super::models::{SubmissionPayload, SubmissionResponse};
use super::transport::ApiRequest;
use crate::core::assessment::ResultSets;
use crate::domain::ApiError;
use std::sync::Arc;

pub struct SubmissionAdapter {
    fetcher: Arc<ResilientFetcher>,
    submit_path: String,
}

impl SubmissionAdapter {
    pub fn new(fetcher: Arc<ResilientFetcher>, submit_path: impl Into<String>) -> Self {
        Self {
            fetcher,
            submit_path: submit_path.into(),
        }
    }

    /// Submits the result sets and returns the service's verdict
    pub async fn submit(&self, results: &ResultSets) -> Result<SubmissionResponse, ApiError> {
        self.submit_payload(SubmissionPayload::from(results)).await
    }

    pub async fn submit_payload(
        &self,
        payload: SubmissionPayload,
    ) -> Result<SubmissionResponse, ApiError> {
        tracing::info!(
            high_risk = payload.high_risk_patients.len(),
            fever = payload.fever_patients.len(),
            data_quality_issues = payload.data_quality_issues.len(),
            "Submitting assessment"
        );

        let body = serde_json::to_value(&payload)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to encode payload: {e}")))?;
        let response = self
            .fetcher
            .request(&ApiRequest::post(self.submit_path.as_str(), body))
            .await?;

        Ok(SubmissionResponse(response))
    }
}
