//! HTTP transport for the patient API
//!
//! The fetcher only needs "send a request, get a status and a JSON body".
//! [`Transport`] captures that capability so the retry and pagination logic
//! can be exercised against scripted responses; [`HttpTransport`] is the
//! `reqwest` implementation used in production.

use crate::config::ApiConfig;
use crate::domain::ApiError;
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Method};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// HTTP verb used by the patient API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        }
    }
}

/// A request relative to the API base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    /// Appends a query parameter
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }
}

/// Raw response: status code plus body
///
/// A body that is not JSON is kept as a JSON string so error messages can
/// still show it. An empty body is `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Capability to send one request to the patient API
///
/// Implementations return `Err` only when no response was received at all
/// (connection refused, DNS failure, timeout); every HTTP status, including
/// 4xx and 5xx, is an `Ok` response for the caller to classify.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError>;

    /// Base URL requests are resolved against
    fn base_url(&self) -> &str;
}

/// `reqwest`-backed transport that attaches the API key to every request
pub struct HttpTransport {
    client: Client,
    base_url: String,
    config: ApiConfig,
}

impl HttpTransport {
    /// Create a new transport from configuration
    ///
    /// # Errors
    ///
    /// Returns `RequestFailed` if the base URL does not parse or the HTTP
    /// client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        Url::parse(&config.base_url).map_err(|e| {
            ApiError::RequestFailed(format!("Invalid base URL '{}': {e}", config.base_url))
        })?;

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(30)))
            .build()
            .map_err(|e| ApiError::RequestFailed(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            config,
        })
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url, ApiError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, request.path)).map_err(|e| {
            ApiError::RequestFailed(format!("Invalid request path '{}': {e}", request.path))
        })?;

        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.url_for(request)?;
        tracing::debug!(method = ?request.method, url = %url, "Sending request");

        let api_key: &str = self.config.api_key.expose_secret().as_ref();
        let mut builder = self
            .client
            .request(request.method.into(), url)
            .header(self.config.api_key_header.as_str(), api_key);

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(format!("Failed to reach patient API: {e}")))?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| {
            ApiError::RequestFailed(format!("Failed to read response body: {e}"))
        })?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(ApiResponse { status, body })
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
