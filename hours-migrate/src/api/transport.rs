//! HTTP transport abstraction
//!
//! The client only needs "send this request, give me status and body", so
//! the seam is kept that narrow. `ReqwestTransport` is used at runtime, tests
//! plug in a scripted transport instead.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::fmt;

use super::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully prepared request
#[derive(Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// Absolute URL
    pub url: String,
    /// Path relative to the API base, used in error reports
    pub path: String,
    pub bearer_token: String,
    /// JSON body, sent with `Content-Type: application/json`
    pub body: Option<String>,
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("path", &self.path)
            .field("bearer_token", &"<redacted>")
            .field("body_len", &self.body.as_ref().map(|b| b.len()))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send one request. Non-success statuses are returned as responses, only
    /// failures to obtain a response at all are errors.
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Transport backed by a shared `reqwest::Client`
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    // Only timeouts and failed connects can succeed on a second try; builder,
    // body and decode errors will fail the same way again.
    fn transport_error(request: &HttpRequest, err: reqwest::Error) -> ApiError {
        ApiError::Transport {
            method: request.method.to_string(),
            path: request.path.clone(),
            retryable: err.is_timeout() || err.is_connect(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        }
        .bearer_auth(&request.bearer_token);

        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::transport_error(request, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Self::transport_error(request, e))?;

        Ok(HttpResponse { status, body })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(HttpResponse { status: 200, body: String::new() }.is_success());
        assert!(HttpResponse { status: 204, body: String::new() }.is_success());
        assert!(!HttpResponse { status: 302, body: String::new() }.is_success());
        assert!(!HttpResponse { status: 404, body: String::new() }.is_success());
    }

    #[test]
    fn test_request_debug_redacts_token() {
        let request = HttpRequest {
            method: Method::Get,
            url: "https://api.smartsheet.com/2.0/sheets/1".into(),
            path: "sheets/1".into(),
            bearer_token: "secret-token".into(),
            body: None,
        };
        let debug = format!("{:?}", request);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }

    fn request(url: &str) -> HttpRequest {
        HttpRequest {
            method: Method::Get,
            url: url.into(),
            path: "sheets/1".into(),
            bearer_token: "tok".into(),
            body: None,
        }
    }

    #[test]
    fn test_builder_error_is_not_retryable() {
        let err = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        let api = ReqwestTransport::transport_error(&request("not a url"), err);
        assert!(matches!(api, ApiError::Transport { retryable: false, .. }));
    }

    #[tokio::test]
    async fn test_connect_failure_is_retryable() {
        // Nothing listens on port 1 of the loopback interface
        let transport = ReqwestTransport::new();
        let err = transport
            .send(&request("http://127.0.0.1:1/sheets/1"))
            .await
            .unwrap_err();
        assert!(err.is_retryable(), "{}", err);
    }
}
