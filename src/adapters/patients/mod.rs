//! Patient API adapter
//!
//! Integration with the remote assessment service: the HTTP transport, the
//! retrying page fetcher, and the submission adapter.

pub mod fetcher;
pub mod models;
pub mod submission;
pub mod transport;

pub use fetcher::{classify_response, PageSettings, ResilientFetcher, RetryPolicy};
pub use models::{Pagination, PatientPage, SubmissionPayload, SubmissionResponse};
pub use submission::SubmissionAdapter;
pub use transport::{ApiRequest, ApiResponse, HttpMethod, HttpTransport, Transport};
