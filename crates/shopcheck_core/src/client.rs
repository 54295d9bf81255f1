//! Blocking HTTP client for the API under test and its response envelope.

use crate::config::ApiConfig;
use crate::error::{HarnessError, Result};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::{Duration, Instant};

/// Thin wrapper over a blocking `reqwest` client rooted at the API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    health_path: String,
}

impl ApiClient {
    /// Build a client from API settings.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            health_path: config.health_path.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path such as `/auth/login`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str) -> ApiRequest {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> ApiRequest {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: &str) -> ApiRequest {
        self.request(Method::PUT, path)
    }

    pub fn patch(&self, path: &str) -> ApiRequest {
        self.request(Method::PATCH, path)
    }

    pub fn delete(&self, path: &str) -> ApiRequest {
        self.request(Method::DELETE, path)
    }

    fn request(&self, method: Method, path: &str) -> ApiRequest {
        let url = self.url(path);
        ApiRequest {
            inner: self.http.request(method.clone(), &url),
            method,
            url,
        }
    }

    /// Poll the health endpoint until it answers 2xx or `timeout` elapses.
    pub fn wait_until_healthy(&self, timeout: Duration) -> Result<()> {
        let url = self.url(&self.health_path);
        let deadline = Instant::now() + timeout;

        loop {
            match self.http.get(&url).send() {
                Ok(resp) if resp.status().is_success() => {
                    tracing::info!(%url, "API is healthy");
                    return Ok(());
                }
                Ok(resp) => tracing::debug!(%url, status = resp.status().as_u16(), "API not ready"),
                Err(e) => tracing::debug!(%url, error = %e, "API not reachable"),
            }

            if Instant::now() >= deadline {
                return Err(HarnessError::Unhealthy {
                    url,
                    waited_secs: timeout.as_secs(),
                });
            }
            std::thread::sleep(Duration::from_millis(500));
        }
    }
}

/// A request being assembled. Sending it is a single blocking round trip.
#[derive(Debug)]
pub struct ApiRequest {
    inner: RequestBuilder,
    method: Method,
    url: String,
}

impl ApiRequest {
    /// Attach a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        self.inner = self.inner.json(body);
        self
    }

    /// Attach `Authorization: Bearer <token>`.
    pub fn bearer(mut self, token: &str) -> Self {
        self.inner = self.inner.bearer_auth(token);
        self
    }

    /// Attach a raw `Authorization` header value, for malformed-credential cases.
    pub fn authorization(mut self, value: &str) -> Self {
        self.inner = self.inner.header(AUTHORIZATION, value);
        self
    }

    /// Send the request and capture status and body.
    pub fn send(self) -> Result<ApiResponse> {
        let resp = self.inner.send()?;
        let status = resp.status().as_u16();
        let text = resp.text()?;
        tracing::debug!(method = %self.method, url = %self.url, status, "request completed");
        Ok(ApiResponse::new(status, ResponseBody::decode(text)))
    }
}

/// Body of a response: decoded JSON, or the raw text when it is not JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// Decode a body, falling back to raw text instead of failing.
    pub fn decode(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text),
        }
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => write!(f, "{}", value),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Status code and body of a completed call.
///
/// Envelope accessors follow the API convention: successes carry
/// `success: true` and `data` (sometimes `count`), failures carry
/// `error.code` and `error.message`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn new(status: u16, body: ResponseBody) -> Self {
        Self { status, body }
    }

    /// The decoded JSON body, if the body was JSON.
    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    /// Look up a value by JSON pointer (`/data/items/0/quantity`).
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.json().and_then(|v| v.pointer(pointer))
    }

    pub fn success(&self) -> Option<bool> {
        self.pointer("/success").and_then(Value::as_bool)
    }

    pub fn error_code(&self) -> Option<&str> {
        self.pointer("/error/code").and_then(Value::as_str)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.pointer("/error/message").and_then(Value::as_str)
    }

    pub fn count(&self) -> Option<u64> {
        self.pointer("/count").and_then(Value::as_u64)
    }

    /// Extract a string field, e.g. an id to publish as a fixture.
    pub fn text_at(&self, pointer: &str) -> Result<String> {
        self.pointer(pointer)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| HarnessError::MissingField {
                pointer: pointer.to_string(),
            })
    }
}
