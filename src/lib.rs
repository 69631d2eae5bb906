// Vigil - Patient Risk Assessment Client
// Copyright (c) 2025 Vigil Contributors
// Licensed under the MIT License

//! # Vigil - Patient Risk Assessment Client
//!
//! Vigil pulls patient vital signs from a paginated, rate-limited and
//! occasionally failing assessment API, scores each patient against a risk
//! rubric, and submits the resulting patient sets back to the service.
//!
//! ## Overview
//!
//! This library provides:
//! - **Fetching** every patient page with retry, exponential backoff and rate-limit handling
//! - **Parsing** blood pressure, temperature and age into valid readings or explicit invalid markers
//! - **Scoring** each patient and partitioning the batch into high-risk, fever and data-quality sets
//! - **Submitting** the sets and surfacing the service's feedback
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (parsing, classification, analysis, orchestration)
//! - [`adapters`] - The patient API transport, fetcher and submitter
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vigil::config::load_config;
//! use vigil::core::assessment::AssessmentCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("vigil.toml")?;
//!     let coordinator = AssessmentCoordinator::new(&config)?;
//!
//!     let report = coordinator.run(false).await?;
//!
//!     println!("High risk patients: {:?}", report.results.high_risk);
//!     Ok(())
//! }
//! ```
//!
//! ## Classifying a Single Record
//!
//! ```rust
//! use vigil::core::assessment::classify;
//! use vigil::domain::PatientRecord;
//!
//! let record: PatientRecord = serde_json::from_value(serde_json::json!({
//!     "patient_id": "DEMO001",
//!     "blood_pressure": "150/95",
//!     "temperature": 101.5,
//!     "age": 70
//! })).unwrap();
//!
//! let classification = classify(&record);
//! assert_eq!(classification.score.total(), 8);
//! assert!(classification.is_high_risk);
//! assert!(classification.has_fever);
//! ```
//!
//! ## Error Handling
//!
//! Vigil uses the [`domain::VigilError`] type for all errors. Malformed vital
//! signs are not errors; they are [`core::assessment::Vital::Invalid`] values
//! and count as data quality issues.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
