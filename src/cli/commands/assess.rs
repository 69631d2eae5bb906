//! Assess command implementation
//!
//! This module implements the `assess` command: fetch all patients, classify
//! them and submit the result sets.

use crate::config::parse_config;
use crate::core::assessment::{AssessmentCoordinator, AssessmentReport};
use crate::domain::{PatientId, VigilError};
use clap::Args;
use std::collections::BTreeSet;

/// Arguments for the assess command
#[derive(Args, Debug)]
pub struct AssessArgs {
    /// Analyze without submitting results
    #[arg(long)]
    pub dry_run: bool,

    /// Write the run report as JSON to this file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// Override the API base URL
    #[arg(long)]
    pub base_url: Option<String>,
}

impl AssessArgs {
    /// Execute the assess command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting assess command");

        let mut config = match parse_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        if let Some(base_url) = &self.base_url {
            tracing::info!(base_url = %base_url, "Overriding API base URL from CLI");
            config.api.base_url = base_url.clone();
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2); // Configuration error exit code
        }

        let dry_run = self.dry_run || config.application.dry_run;
        if dry_run {
            println!("🔍 DRY RUN MODE - results will not be submitted");
            println!();
        }

        let coordinator = match AssessmentCoordinator::new(&config) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create assessment coordinator");
                eprintln!("Failed to initialize assessment: {e}");
                return Ok(4);
            }
        };

        println!("🚀 Fetching patients from {}", config.api.base_url);
        let report = match coordinator.run(dry_run).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Assessment failed");
                eprintln!("Assessment failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        print_report(&report);

        if let Some(path) = &self.output {
            report.write_json(path)?;
            println!("📝 Report written to {path}");
        }

        println!("✅ Assessment completed!");
        Ok(0)
    }
}

/// Maps a run failure to the process exit code
fn exit_code_for(error: &VigilError) -> i32 {
    match error {
        VigilError::Configuration(_) => 2,
        VigilError::AssessmentAborted(_) => 3,
        VigilError::Api(_) => 4,
        _ => 5,
    }
}

fn print_report(report: &AssessmentReport) {
    let summary = &report.summary;

    println!();
    println!("📊 Assessment Summary:");
    println!("  Run ID: {}", report.run_id);
    println!("  Total Patients: {}", summary.total_patients);
    println!("  Without Data Issues: {}", summary.patients_without_issues);
    println!("  High Risk: {}", summary.high_risk_count);
    println!("  Fever: {}", summary.fever_count);
    println!("  Data Quality Issues: {}", summary.data_quality_count);
    if summary.skipped_records > 0 {
        println!("  Skipped (no patient_id): {}", summary.skipped_records);
    }
    println!(
        "  Data Quality Issue Rate: {:.2}%",
        summary.data_quality_issue_rate
    );
    println!(
        "  Duration: {:.2}s",
        report.duration().num_milliseconds() as f64 / 1000.0
    );
    println!();

    print_set("High risk patients", &report.results.high_risk);
    print_set("Fever patients", &report.results.fever);
    print_set("Data quality issues", &report.results.data_quality_issues);
    println!();

    if let Some(response) = &report.submission {
        println!("📬 Submission Result:");
        if let Some(message) = response.message() {
            println!("  Message: {message}");
        }
        if let Some(score) = response.score() {
            println!("  Score: {score}");
        }
        if let Some(percentage) = response.percentage() {
            println!("  Percentage: {percentage}%");
        }
        if let Some(status) = response.status() {
            println!("  Status: {status}");
        }
        for (label, value) in [
            ("Breakdown", response.breakdown()),
            ("Feedback", response.feedback()),
        ] {
            if let Some(value) = value {
                let pretty = serde_json::to_string_pretty(value).unwrap_or_default();
                println!("  {label}:");
                for line in pretty.lines() {
                    println!("    {line}");
                }
            }
        }
        println!();
    }
}

fn print_set(label: &str, ids: &BTreeSet<PatientId>) {
    let joined: Vec<&str> = ids.iter().map(PatientId::as_str).collect();
    if joined.is_empty() {
        println!("  {label}: (none)");
    } else {
        println!("  {label} ({}): {}", joined.len(), joined.join(", "));
    }
}
