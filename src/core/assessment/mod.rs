//! Patient risk assessment
//!
//! This module provides the classification engine and the run orchestration:
//! - [`parser`] - Total parsing of raw vital-sign fields
//! - [`classifier`] - Per-factor risk scores and derived predicates
//! - [`analyzer`] - Partitioning of a patient batch into result sets
//! - [`coordinator`] - Fetch, analyze and submit in one run
//! - [`report`] - Serializable outcome of a run

pub mod analyzer;
pub mod classifier;
pub mod coordinator;
pub mod parser;
pub mod report;

pub use analyzer::{AnalysisSummary, BatchAnalyzer, ResultSets};
pub use classifier::{
    classify, AgeCategory, BloodPressureCategory, Classification, RiskScore, TemperatureCategory,
};
pub use coordinator::AssessmentCoordinator;
pub use parser::{AgeReading, BloodPressureReading, ParsedVitals, TemperatureReading, Vital};
pub use report::AssessmentReport;
