//! Assessment coordinator - orchestrates one assessment run
//!
//! Fetch every patient page, classify the records, and submit the result
//! sets. The run is all or nothing: nothing is submitted unless every page
//! was fetched.

use super::analyzer::BatchAnalyzer;
use super::report::AssessmentReport;
use crate::adapters::patients::{HttpTransport, ResilientFetcher, SubmissionAdapter, Transport};
use crate::config::VigilConfig;
use crate::domain::{Result, VigilError};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Assessment coordinator
pub struct AssessmentCoordinator {
    fetcher: Arc<ResilientFetcher>,
    submitter: SubmissionAdapter,
}

impl AssessmentCoordinator {
    /// Create a coordinator talking HTTP to the configured service
    pub fn new(config: &VigilConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(config.api.clone())?);
        Ok(Self::with_transport(config, transport))
    }

    /// Create a coordinator over an arbitrary transport
    pub fn with_transport(config: &VigilConfig, transport: Arc<dyn Transport>) -> Self {
        let fetcher = Arc::new(ResilientFetcher::from_config(transport, config));
        let submitter = SubmissionAdapter::new(fetcher.clone(), config.api.submit_path.clone());
        Self { fetcher, submitter }
    }

    /// Execute one assessment run
    ///
    /// 1. Fetches all pages (fatal on any unrecoverable error)
    /// 2. Aborts if the service returned no patients
    /// 3. Classifies every record
    /// 4. Submits the result sets unless `dry_run`
    pub async fn run(&self, dry_run: bool) -> Result<AssessmentReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        tracing::info!(run_id = %run_id, dry_run = dry_run, "Starting assessment run");

        let patients = self.fetcher.fetch_all_patients().await.map_err(|e| {
            tracing::error!(run_id = %run_id, error = %e, "Failed to fetch patients");
            VigilError::from(e)
        })?;

        if patients.is_empty() {
            return Err(VigilError::AssessmentAborted(
                "the patient API returned no patients".to_string(),
            ));
        }

        let mut analyzer = BatchAnalyzer::new();
        analyzer.analyze(&patients);
        analyzer.summary().log_summary();
        let (results, summary) = analyzer.into_parts();

        let submission = if dry_run {
            tracing::info!(run_id = %run_id, "Dry run - skipping submission");
            None
        } else {
            let response = self.submitter.submit(&results).await.map_err(|e| {
                tracing::error!(run_id = %run_id, error = %e, "Failed to submit assessment");
                VigilError::from(e)
            })?;
            tracing::info!(
                run_id = %run_id,
                score = ?response.score(),
                status = ?response.status(),
                "Assessment submitted"
            );
            Some(response)
        };

        Ok(AssessmentReport {
            run_id,
            started_at,
            completed_at: Utc::now(),
            dry_run,
            summary,
            results,
            submission,
        })
    }
}
