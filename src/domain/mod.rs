//! Domain models and types for Vigil.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`PatientId`])
//! - **Raw input records** ([`PatientRecord`])
//! - **Error types** ([`VigilError`], [`ApiError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, VigilError>`]:
//!
//! ```rust
//! use vigil::domain::{VigilError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = vigil::config::load_config("vigil.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod patient;
pub mod result;

pub use errors::{ApiError, VigilError};
pub use ids::PatientId;
pub use patient::PatientRecord;
pub use result::Result;
