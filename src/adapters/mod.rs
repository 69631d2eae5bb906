//! External integrations
//!
//! - [`patients`] - the remote patient assessment service

pub mod patients;
