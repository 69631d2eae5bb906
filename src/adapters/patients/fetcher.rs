//! Resilient fetcher
//!
//! Wraps a [`Transport`] with status classification, retry with pure
//! exponential backoff, and sequential page traversal.
//!
//! Retry state machine for one logical request:
//!
//! ```text
//! Requesting ──2xx──────────────▶ Succeeded
//!     │
//!     ├──429──▶ RateLimited ─┐ (rate-limit delay, then backoff)
//!     ├──5xx──▶ ServerError ─┴──▶ attempts left? ──yes──▶ Requesting
//!     │                                 └──no───▶ Failed (last error)
//!     └──other──▶ Failed (not retried)
//! ```

use super::models::PatientPage;
use super::transport::{ApiRequest, ApiResponse, Transport};
use crate::config::{PaginationConfig, RetryConfig};
use crate::domain::{ApiError, PatientRecord};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Retry tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,

    /// Backoff before retry `n` is `base_delay * 2^(n-1)`
    pub base_delay: Duration,

    /// Extra fixed pause applied whenever the server answers 429
    pub rate_limit_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: Duration::from_millis(config.base_delay_ms),
            rate_limit_delay: Duration::from_millis(config.rate_limit_delay_ms),
        }
    }

    /// Backoff after the `attempt`-th (1-based) failed attempt
    ///
    /// ```
    /// use vigil::adapters::patients::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy {
    ///     max_attempts: 3,
    ///     base_delay: Duration::from_millis(1000),
    ///     rate_limit_delay: Duration::from_millis(2000),
    /// };
    /// assert_eq!(policy.backoff_delay(1), Duration::from_millis(1000));
    /// assert_eq!(policy.backoff_delay(3), Duration::from_millis(4000));
    /// ```
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32
            .checked_pow(attempt.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

/// Page traversal tunables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSettings {
    /// Path of the patient listing endpoint
    pub patients_path: String,

    /// `limit` sent with every page request
    pub page_size: u32,

    /// Pause between successful page fetches
    pub inter_page_delay: Duration,
}

impl PageSettings {
    /// Requests the largest page the server allows to minimize round trips
    pub fn from_config(patients_path: impl Into<String>, config: &PaginationConfig) -> Self {
        Self {
            patients_path: patients_path.into(),
            page_size: config.max_page_size,
            inter_page_delay: Duration::from_millis(config.inter_page_delay_ms),
        }
    }
}

/// Maps a raw response onto the error taxonomy
///
/// 429 is rate limiting, 5xx a server error (both retryable), any other
/// non-2xx a non-retryable failure. A 2xx yields the body.
pub fn classify_response(response: ApiResponse) -> Result<Value, ApiError> {
    let status = response.status;
    if response.is_success() {
        return Ok(response.body);
    }

    let message = error_message(&response.body);
    match status {
        429 => Err(ApiError::RateLimited(message)),
        s if s >= 500 => Err(ApiError::ServerError { status, message }),
        _ => Err(ApiError::RequestFailed(format!("HTTP {status}: {message}"))),
    }
}

fn error_message(body: &Value) -> String {
    match body {
        Value::Null => "empty response body".to_string(),
        Value::String(s) => s.clone(),
        other => ["message", "error"]
            .iter()
            .find_map(|key| other.get(key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| other.to_string()),
    }
}

/// Sequential, retrying client for the patient API
///
/// # Example
///
/// ```no_run
/// use vigil::adapters::patients::{HttpTransport, ResilientFetcher};
/// use vigil::config::load_config;
/// use std::sync::Arc;
///
/// # async fn example() -> vigil::domain::Result<()> {
/// let config = load_config("vigil.toml")?;
/// let transport = Arc::new(HttpTransport::new(config.api.clone())?);
/// let fetcher = ResilientFetcher::from_config(transport, &config);
///
/// let patients = fetcher.fetch_all_patients().await?;
/// println!("Fetched {} patients", patients.len());
/// # Ok(())
/// # }
/// ```
pub struct ResilientFetcher {
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
    pages: PageSettings,
}

impl ResilientFetcher {
    pub fn new(transport: Arc<dyn Transport>, retry: RetryPolicy, pages: PageSettings) -> Self {
        Self {
            transport,
            retry,
            pages,
        }
    }

    pub fn from_config(transport: Arc<dyn Transport>, config: &crate::config::VigilConfig) -> Self {
        Self::new(
            transport,
            RetryPolicy::from_config(&config.retry),
            PageSettings::from_config(config.api.patients_path.clone(), &config.pagination),
        )
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Sends a request once and classifies the response
    ///
    /// On 429 the fixed rate-limit delay is served here, before the caller's
    /// backoff.
    async fn send_once(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        let response = self.transport.send(request).await?;
        let status = response.status;

        match classify_response(response) {
            Err(ApiError::RateLimited(message)) => {
                tracing::warn!(
                    path = %request.path,
                    delay_ms = self.retry.rate_limit_delay.as_millis() as u64,
                    "Rate limited by patient API, pausing"
                );
                tokio::time::sleep(self.retry.rate_limit_delay).await;
                Err(ApiError::RateLimited(message))
            }
            Err(e) => {
                tracing::debug!(
                    path = %request.path,
                    status = status,
                    error = %e,
                    "Request failed"
                );
                Err(e)
            }
            ok => ok,
        }
    }

    /// Sends a request with retry
    ///
    /// Retryable failures are retried until `max_attempts` is spent, waiting
    /// `base_delay * 2^(attempt-1)` before each retry. Anything else is
    /// returned immediately. When attempts run out the last error is returned.
    pub async fn request(&self, request: &ApiRequest) -> Result<Value, ApiError> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.send_once(request).await {
                Ok(body) => return Ok(body),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) if attempt >= max_attempts => {
                    tracing::error!(
                        path = %request.path,
                        attempts = attempt,
                        error = %e,
                        "Retry budget exhausted"
                    );
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.retry.backoff_delay(attempt);
                    crate::log_retry_attempt!(attempt, max_attempts, delay, e);
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Fetches one page (1-based) at the configured page size
    pub async fn fetch_page(&self, page: u32) -> Result<PatientPage, ApiError> {
        let request = ApiRequest::get(self.pages.patients_path.as_str())
            .with_query("page", page)
            .with_query("limit", self.pages.page_size);

        let body = self.request(&request).await?;
        serde_json::from_value(body).map_err(|e| {
            ApiError::InvalidResponse(format!("Malformed patient page {page}: {e}"))
        })
    }

    /// Fetches every page in order and concatenates their records
    ///
    /// All or nothing: the first unrecoverable page error is returned and
    /// the records gathered so far are dropped.
    pub async fn fetch_all_patients(&self) -> Result<Vec<PatientRecord>, ApiError> {
        let mut patients = Vec::new();
        let mut page = 1;

        tracing::info!(
            base_url = self.transport.base_url(),
            page_size = self.pages.page_size,
            "Fetching patients"
        );

        loop {
            let batch = self.fetch_page(page).await?;
            let has_next = batch.has_next();
            crate::log_page_fetched!(page, batch.data.len(), has_next);

            if has_next {
                check_next_page(page, &batch)?;
            }
            patients.extend(batch.data);

            if !has_next {
                break;
            }

            tokio::time::sleep(self.pages.inter_page_delay).await;
            page += 1;
        }

        tracing::info!(pages = page, patients = patients.len(), "Fetched all patients");
        Ok(patients)
    }
}

/// Rejects a page whose `hasNext` cannot be honored
///
/// A next page is refused when the current page is already the last one the
/// server reported, or when the page was empty yet claims a successor.
fn check_next_page(page: u32, batch: &PatientPage) -> Result<(), ApiError> {
    let total_pages = batch.pagination.as_ref().and_then(|p| p.total_pages);
    if let Some(total_pages) = total_pages {
        if page >= total_pages {
            return Err(ApiError::InvalidResponse(format!(
                "Page {page} claims a next page but totalPages is {total_pages}"
            )));
        }
    }

    if batch.data.is_empty() {
        return Err(ApiError::InvalidResponse(format!(
            "Page {page} is empty but claims a next page"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Transport replaying a fixed script of responses
    struct ScriptedTransport {
        script: Mutex<VecDeque<Result<ApiResponse, ApiError>>>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<ApiResponse, ApiError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
            self.requests.lock().unwrap().push(request.clone());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::RequestFailed("script exhausted".to_string())))
        }

        fn base_url(&self) -> &str {
            "http://scripted"
        }
    }

    fn fetcher(transport: Arc<ScriptedTransport>, max_attempts: u32) -> ResilientFetcher {
        ResilientFetcher::new(
            transport,
            RetryPolicy {
                max_attempts,
                base_delay: Duration::from_millis(100),
                rate_limit_delay: Duration::from_millis(500),
            },
            PageSettings {
                patients_path: "/patients".to_string(),
                page_size: 20,
                inter_page_delay: Duration::from_millis(50),
            },
        )
    }

    fn ok(body: Value) -> Result<ApiResponse, ApiError> {
        Ok(ApiResponse::new(200, body))
    }

    fn status(code: u16) -> Result<ApiResponse, ApiError> {
        Ok(ApiResponse::new(code, json!({ "message": format!("status {code}") })))
    }

    fn page(ids: &[&str], has_next: bool) -> Result<ApiResponse, ApiError> {
        let data: Vec<Value> = ids.iter().map(|id| json!({ "patient_id": id })).collect();
        ok(json!({ "data": data, "pagination": { "hasNext": has_next } }))
    }

    #[test]
    fn test_classify_response() {
        assert_eq!(classify_response(ApiResponse::new(200, json!({"a": 1}))), Ok(json!({"a": 1})));
        assert!(matches!(
            classify_response(ApiResponse::new(429, Value::Null)),
            Err(ApiError::RateLimited(_))
        ));
        assert_eq!(
            classify_response(ApiResponse::new(503, json!({ "error": "maintenance" }))),
            Err(ApiError::ServerError {
                status: 503,
                message: "maintenance".to_string()
            })
        );
        assert_eq!(
            classify_response(ApiResponse::new(401, json!("bad key"))),
            Err(ApiError::RequestFailed("HTTP 401: bad key".to_string()))
        );
    }

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(250),
            rate_limit_delay: Duration::ZERO,
        };
        let delays: Vec<u128> = (1..=4).map(|n| policy.backoff_delay(n).as_millis()).collect();
        assert_eq!(delays, vec![250, 500, 1000, 2000]);
    }

    #[test]
    fn test_backoff_saturates() {
        let policy = RetryPolicy {
            max_attempts: 100,
            base_delay: Duration::from_secs(1),
            rate_limit_delay: Duration::ZERO,
        };
        assert!(policy.backoff_delay(64) >= policy.backoff_delay(32));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_succeeds_on_last_attempt() {
        let transport =
            ScriptedTransport::new(vec![status(500), status(502), ok(json!({"ok": true}))]);
        let fetcher = fetcher(transport.clone(), 3);

        let result = fetcher.request(&ApiRequest::get("/patients")).await;
        assert_eq!(result, Ok(json!({"ok": true})));
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_exhaustion_returns_last_error() {
        let transport = ScriptedTransport::new(vec![
            status(500),
            status(502),
            status(503),
            ok(json!({})),
        ]);
        let fetcher = fetcher(transport.clone(), 3);

        let result = fetcher.request(&ApiRequest::get("/patients")).await;
        assert!(matches!(result, Err(ApiError::ServerError { status: 503, .. })));
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_is_not_retried() {
        let transport = ScriptedTransport::new(vec![status(404), ok(json!({}))]);
        let fetcher = fetcher(transport.clone(), 3);

        let result = fetcher.request(&ApiRequest::get("/patients")).await;
        assert!(matches!(result, Err(ApiError::RequestFailed(_))));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_failure_is_not_retried() {
        let transport = ScriptedTransport::new(vec![
            Err(ApiError::RequestFailed("connection refused".to_string())),
            ok(json!({})),
        ]);
        let fetcher = fetcher(transport.clone(), 3);

        assert!(fetcher.request(&ApiRequest::get("/patients")).await.is_err());
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_delays_are_applied() {
        let transport = ScriptedTransport::new(vec![status(500), status(500), ok(json!({}))]);
        let fetcher = fetcher(transport, 3);

        let start = tokio::time::Instant::now();
        fetcher.request(&ApiRequest::get("/patients")).await.unwrap();
        let elapsed = start.elapsed();

        // 100ms + 200ms
        assert!(elapsed >= Duration::from_millis(300));
        assert!(elapsed < Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_delay_stacks_with_backoff() {
        let transport = ScriptedTransport::new(vec![status(429), status(429), ok(json!({}))]);
        let fetcher = fetcher(transport, 3);

        let start = tokio::time::Instant::now();
        fetcher.request(&ApiRequest::get("/patients")).await.unwrap();
        let elapsed = start.elapsed();

        // (500 + 100) + (500 + 200)
        assert!(elapsed >= Duration::from_millis(1300));
        assert!(elapsed < Duration::from_millis(1400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_max_attempts_still_tries_once() {
        let transport = ScriptedTransport::new(vec![status(500)]);
        let fetcher = fetcher(transport.clone(), 0);

        assert!(fetcher.request(&ApiRequest::get("/patients")).await.is_err());
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pagination_concatenates_pages_in_order() {
        let transport = ScriptedTransport::new(vec![
            page(&["DEMO001", "DEMO002"], true),
            page(&["DEMO003"], true),
            page(&["DEMO004", "DEMO005"], false),
        ]);
        let fetcher = fetcher(transport.clone(), 3);

        let patients = fetcher.fetch_all_patients().await.unwrap();
        let ids: Vec<String> = patients
            .iter()
            .map(|p| p.patient_id().unwrap().into_inner())
            .collect();
        assert_eq!(ids, vec!["DEMO001", "DEMO002", "DEMO003", "DEMO004", "DEMO005"]);

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        for (index, request) in requests.iter().enumerate() {
            assert_eq!(request.path, "/patients");
            assert_eq!(
                request.query,
                vec![
                    ("page".to_string(), (index + 1).to_string()),
                    ("limit".to_string(), "20".to_string())
                ]
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_pagination_retries_transient_page_failure() {
        let transport = ScriptedTransport::new(vec![
            page(&["DEMO001"], true),
            status(429),
            page(&["DEMO002"], false),
        ]);
        let fetcher = fetcher(transport.clone(), 3);

        let patients = fetcher.fetch_all_patients().await.unwrap();
        assert_eq!(patients.len(), 2);
        assert_eq!(transport.requests()[2].query[0], ("page".to_string(), "2".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pagination_is_all_or_nothing() {
        let transport = ScriptedTransport::new(vec![page(&["DEMO001"], true), status(400)]);
        let fetcher = fetcher(transport, 3);

        let result = fetcher.fetch_all_patients().await;
        assert!(matches!(result, Err(ApiError::RequestFailed(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_page_without_data_is_invalid_response() {
        let transport = ScriptedTransport::new(vec![ok(json!({ "patients": [] }))]);
        let fetcher = fetcher(transport, 3);

        let result = fetcher.fetch_all_patients().await;
        assert!(matches!(result, Err(ApiError::InvalidResponse(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_inter_page_delay_only_between_pages() {
        let transport = ScriptedTransport::new(vec![
            page(&["A"], true),
            page(&["B"], true),
            page(&["C"], false),
        ]);
        let fetcher = fetcher(transport, 3);

        let start = tokio::time::Instant::now();
        fetcher.fetch_all_patients().await.unwrap();
        let elapsed = start.elapsed();

        // two gaps of 50ms
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_millis(150));
    }

    #[test]
    fn test_page_size_is_max_page_size() {
        let config = PaginationConfig {
            max_page_size: 20,
            default_page_size: 5,
            inter_page_delay_ms: 250,
        };
        let pages = PageSettings::from_config("/patients", &config);
        assert_eq!(pages.page_size, 20);
        assert_eq!(pages.inter_page_delay, Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_page_claiming_next_stops_traversal() {
        let endless = || ok(json!({ "data": [], "pagination": { "hasNext": true } }));
        let transport = ScriptedTransport::new(vec![endless(), endless(), endless()]);
        let fetcher = fetcher(transport.clone(), 3);

        let result = fetcher.fetch_all_patients().await;
        assert!(matches!(result, Err(ApiError::InvalidResponse(_))));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_page_beyond_total_pages_stops_traversal() {
        let claims_more = |id: &str, page: u32| {
            ok(json!({
                "data": [{ "patient_id": id }],
                "pagination": { "page": page, "totalPages": 2, "hasNext": true }
            }))
        };
        let transport = ScriptedTransport::new(vec![
            claims_more("A", 1),
            claims_more("B", 2),
            claims_more("C", 3),
        ]);
        let fetcher = fetcher(transport.clone(), 3);

        let result = fetcher.fetch_all_patients().await;
        assert!(matches!(result, Err(ApiError::InvalidResponse(_))));
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_endless_has_next_terminates() {
        /// Always answers with an empty page that claims a successor
        struct EndlessPages;

        #[async_trait]
        impl Transport for EndlessPages {
            async fn send(&self, _request: &ApiRequest) -> Result<ApiResponse, ApiError> {
                Ok(ApiResponse::new(
                    200,
                    json!({ "data": [], "pagination": { "hasNext": true, "totalPages": 2 } }),
                ))
            }

            fn base_url(&self) -> &str {
                "http://endless"
            }
        }

        let fetcher = ResilientFetcher::new(
            Arc::new(EndlessPages),
            RetryPolicy::default(),
            PageSettings {
                patients_path: "/patients".to_string(),
                page_size: 20,
                inter_page_delay: Duration::from_millis(500),
            },
        );

        let result =
            tokio::time::timeout(Duration::from_secs(3600), fetcher.fetch_all_patients()).await;
        assert!(matches!(result, Ok(Err(ApiError::InvalidResponse(_)))));
    }
}
