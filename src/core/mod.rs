//! Core business logic for Vigil.
//!
//! # Modules
//!
//! - [`assessment`] - Field parsing, risk scoring, batch analysis and run orchestration
//!
//! # Assessment Workflow
//!
//! 1. **Fetch**: Page through the patient API with retry and backoff
//! 2. **Parse**: Normalize blood pressure, temperature and age
//! 3. **Score**: Apply the risk rubric per patient
//! 4. **Partition**: Build the high-risk, fever and data-quality sets
//! 5. **Submit**: Post the sets back to the service
//!
//! # Example
//!
//! ```rust,no_run
//! use vigil::config::load_config;
//! use vigil::core::assessment::AssessmentCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("vigil.toml")?;
//! let coordinator = AssessmentCoordinator::new(&config)?;
//!
//! let report = coordinator.run(false).await?;
//!
//! println!("High risk: {}", report.summary.high_risk_count);
//! println!("Fever: {}", report.summary.fever_count);
//! println!("Data quality issues: {}", report.summary.data_quality_count);
//! # Ok(())
//! # }
//! ```

pub mod assessment;
