//! REST client for the automation backend.
//!
//! Every request carries `Authorization: Bearer <token>`; requests with a body
//! also carry `Content-Type: application/json`. There is no retry, timeout or
//! cache: each call is a single fresh round trip.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::config::ApiConfig;
use crate::error::{ConsoleError, Result};
use crate::models::{EntityId, GroupedExecutions, Resource, Step};
use crate::query::ExecutionQuery;

/// Path of the grouped executions endpoint.
pub const GROUPED_EXECUTIONS_PATH: &str = "/step-executions-grouped";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request, independent of how it is carried.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the base URL, starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), body: None }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, query: &[(String, String)]) -> Self {
        self.query = query.to_vec();
        self
    }
}

/// Carries requests to the backend and returns parsed JSON.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Returns the parsed body of a 2xx response (`Value::Null` when empty).
    async fn send(&self, request: ApiRequest) -> Result<Value>;
}

/// `Transport` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            base_url: config.base_url()?,
            token: config.token().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Extracts a human-readable message from an error response body.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ErrorPayload>(body) {
        if let Some(message) = payload.error.or(payload.message).filter(|m| !m.is_empty()) {
            return message;
        }
    }
    let body = body.trim();
    if body.is_empty() {
        status.canonical_reason().unwrap_or("Request failed").to_string()
    } else {
        body.chars().take(200).collect()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = %request.method, path = %request.path, "Sending API request");

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        }
        .bearer_auth(&self.token);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            error!(error = %e, url = %url, "API request failed to reach backend");
            if e.is_connect() {
                ConsoleError::Transport(format!("Backend not reachable at {}", self.base_url))
            } else {
                ConsoleError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(ConsoleError::from)?;

        if !status.is_success() {
            let message = error_message(status, &text);
            error!(status = %status, path = %request.path, error = %message, "API returned error status");
            return Err(ConsoleError::Status { status: status.as_u16(), message });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Typed access to the backend's collections.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient").finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates an HTTP-backed client.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new(config)?)))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Issues one request and returns the parsed response.
    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let mut request = ApiRequest::new(method, path);
        request.body = body;
        self.transport.send(request).await
    }

    pub async fn list<R: Resource>(&self) -> Result<Vec<R>> {
        let value = self.request(Method::Get, R::PATH, None).await?;
        decode_list(value)
    }

    /// POSTs a draft and returns the raw response body.
    pub async fn create<R: Resource>(&self, draft: &R::Draft) -> Result<Value> {
        let body = serde_json::to_value(draft)?;
        self.request(Method::Post, R::PATH, Some(body)).await
    }

    /// PUTs a draft over the record and returns the raw response body.
    pub async fn update<R: Resource>(&self, id: EntityId, draft: &R::Draft) -> Result<Value> {
        let body = serde_json::to_value(draft)?;
        self.request(Method::Put, &format!("{}/{}", R::PATH, id), Some(body)).await
    }

    pub async fn delete<R: Resource>(&self, id: EntityId) -> Result<()> {
        self.request(Method::Delete, &format!("{}/{}", R::PATH, id), None).await?;
        Ok(())
    }

    /// Steps of one workflow, filtered by the backend.
    pub async fn list_steps_by_workflow(&self, workflow_id: EntityId) -> Result<Vec<Step>> {
        let value = self
            .request(Method::Get, &format!("{}/by-workflow/{}", Step::PATH, workflow_id), None)
            .await?;
        decode_list(value)
    }

    pub async fn grouped_executions(&self, query: &ExecutionQuery) -> Result<GroupedExecutions> {
        let request = ApiRequest::new(Method::Get, GROUPED_EXECUTIONS_PATH).with_query(query.pairs());
        let value = self.transport.send(request).await?;
        Ok(serde_json::from_value(value)?)
    }
}

fn decode_list<R: serde::de::DeserializeOwned>(value: Value) -> Result<Vec<R>> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_value(value)?)
}
