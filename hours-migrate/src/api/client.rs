//! Smartsheet API client
//!
//! Wraps an [`HttpTransport`] with bearer authentication, status checking,
//! JSON decoding and the configured retry policy.

use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::models::{AddRowsResult, NewRow, Sheet};
use super::resilience::{MonitoringConfig, RetryPolicy};
use super::transport::{HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport};
use crate::config::ApiConfig;

pub struct SheetClient<T = ReqwestTransport> {
    base_url: String,
    access_token: String,
    transport: T,
    retry: RetryPolicy,
    monitoring: MonitoringConfig,
}

impl SheetClient<ReqwestTransport> {
    /// Create a client that talks to the configured base URL over reqwest
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }
}

impl<T: HttpTransport> SheetClient<T> {
    pub fn with_transport(config: &ApiConfig, transport: T) -> Self {
        let mut base_url = config.base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Self {
            base_url,
            access_token: config.access_token.clone(),
            transport,
            retry: RetryPolicy::new(config.resilience.retry.clone()),
            monitoring: config.resilience.monitoring.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch one sheet by ID, including all columns and rows
    pub async fn fetch_sheet(&self, sheet_id: &str) -> Result<Sheet, ApiError> {
        self.call(Method::Get, format!("sheets/{}", sheet_id), None)
            .await
    }

    /// Append all `rows` to a sheet in a single request
    pub async fn add_rows(&self, sheet_id: &str, rows: &[NewRow]) -> Result<AddRowsResult, ApiError> {
        let path = format!("sheets/{}/rows", sheet_id);
        let body = serde_json::to_string(rows).map_err(|e| ApiError::Encode {
            method: Method::Post.to_string(),
            path: path.clone(),
            message: e.to_string(),
        })?;

        info!("Adding {} rows", rows.len());
        self.call(Method::Post, path, Some(body)).await
    }

    async fn call<R: DeserializeOwned>(
        &self,
        method: Method,
        path: String,
        body: Option<String>,
    ) -> Result<R, ApiError> {
        let request = HttpRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            path,
            bearer_token: self.access_token.clone(),
            body,
        };
        let label = format!("{} {}", method, request.path);

        let response = self
            .retry
            .execute_with_hook(
                &label,
                || self.send_once(&request),
                |err, attempt| {
                    Self::warn_before_retry(&request, err, attempt);
                },
            )
            .await?;

        serde_json::from_str(&response.body).map_err(|e| ApiError::Decode {
            method: method.to_string(),
            path: request.path.clone(),
            message: e.to_string(),
        })
    }

    async fn send_once(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        if self.monitoring.request_logging {
            info!("{} {}", request.method, request.url);
        } else {
            debug!("{} {}", request.method, request.url);
        }

        let response = self.transport.send(request).await?;
        debug!(
            "{} {} -> {} ({} bytes)",
            request.method,
            request.path,
            response.status,
            response.body.len()
        );

        if !response.is_success() {
            return Err(ApiError::status(
                request.method.as_str(),
                request.path.clone(),
                response.status,
                response.body,
            ));
        }

        Ok(response)
    }

    /// Called when a failed attempt is about to be repeated. Returns whether a
    /// duplicate-row warning was logged.
    fn warn_before_retry(request: &HttpRequest, err: &ApiError, attempt: u32) -> bool {
        if request.method != Method::Post {
            return false;
        }
        warn!(
            "Retrying write to {} after attempt {} failed ({}); rows may be duplicated if the server applied it",
            request.path, attempt, err
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::NewCell;
    use crate::api::resilience::{ResilienceConfig, RetryConfig};
    use crate::api::transport::testing::ScriptedTransport;
    use serde_json::json;
    use std::time::Duration;

    fn api_config(max_attempts: u32) -> ApiConfig {
        ApiConfig {
            base_url: "https://api.example.test/2.0".into(),
            access_token: "token-123".into(),
            resilience: ResilienceConfig::builder()
                .retry_config(RetryConfig {
                    max_attempts,
                    base_delay: Duration::from_millis(1),
                    max_delay: Duration::from_millis(2),
                    backoff_multiplier: 1.0,
                    jitter: false,
                })
                .build(),
        }
    }

    #[tokio::test]
    async fn test_fetch_sheet_sends_authenticated_get() {
        let transport = ScriptedTransport::new().respond(
            200,
            json!({ "id": 5, "columns": [], "rows": [] }).to_string(),
        );
        let client = SheetClient::with_transport(&api_config(1), transport);

        let sheet = client.fetch_sheet("5").await.unwrap();
        assert_eq!(sheet.id, 5);

        let requests = client.transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Get);
        assert_eq!(requests[0].url, "https://api.example.test/2.0/sheets/5");
        assert_eq!(requests[0].bearer_token, "token-123");
        assert!(requests[0].body.is_none());
    }

    #[tokio::test]
    async fn test_add_rows_posts_whole_batch() {
        let transport = ScriptedTransport::new().respond(
            200,
            json!({ "message": "SUCCESS", "resultCode": 0, "result": [] }).to_string(),
        );
        let client = SheetClient::with_transport(&api_config(1), transport);
        let rows = vec![
            NewRow::to_bottom(vec![NewCell::new(1, "ProjA")]),
            NewRow::to_bottom(vec![NewCell::new(1, "ProjB")]),
        ];

        let ack = client.add_rows("9", &rows).await.unwrap();
        assert_eq!(ack.message, "SUCCESS");

        let requests = client.transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].path, "sheets/9/rows");
        let sent: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(sent.as_array().unwrap().len(), 2);
        assert_eq!(sent[1]["toBottom"], json!(true));
        assert_eq!(sent[1]["cells"][0]["value"], json!("ProjB"));
    }

    #[tokio::test]
    async fn test_write_failure_propagates() {
        let transport = ScriptedTransport::new().respond(400, "{\"errorCode\":1012}");
        let client = SheetClient::with_transport(&api_config(3), transport);

        let err = client.add_rows("9", &[]).await.unwrap_err();
        assert_eq!(
            err,
            ApiError::status("POST", "sheets/9/rows", 400, "{\"errorCode\":1012}")
        );
        assert_eq!(client.transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried() {
        let transport = ScriptedTransport::new()
            .respond(503, "unavailable")
            .respond(200, json!({ "id": 5 }).to_string());
        let client = SheetClient::with_transport(&api_config(3), transport);

        let sheet = client.fetch_sheet("5").await.unwrap();
        assert_eq!(sheet.id, 5);
        assert_eq!(client.transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_single_attempt_aborts_on_first_failure() {
        let transport = ScriptedTransport::new().respond(429, "rate limited");
        let client = SheetClient::with_transport(&api_config(1), transport);

        let err = client.fetch_sheet("5").await.unwrap_err();
        assert_eq!(err.status_code(), Some(429));
        assert_eq!(client.transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_is_surfaced() {
        let transport = ScriptedTransport::new().fail(ApiError::Transport {
            method: "GET".into(),
            path: "sheets/5".into(),
            message: "connection refused".into(),
            retryable: false,
        });
        let client = SheetClient::with_transport(&api_config(3), transport);

        let err = client.fetch_sheet("5").await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_decode_error() {
        let transport = ScriptedTransport::new().respond(200, "<html>");
        let client = SheetClient::with_transport(&api_config(1), transport);

        let err = client.fetch_sheet("5").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = SheetClient::with_transport(&api_config(1), ScriptedTransport::new());
        assert_eq!(client.base_url(), "https://api.example.test/2.0/");
    }

    #[tokio::test]
    async fn test_append_retried_after_timeout_and_unavailable() {
        let transport = ScriptedTransport::new()
            .fail(ApiError::Transport {
                method: "POST".into(),
                path: "sheets/9/rows".into(),
                message: "operation timed out".into(),
                retryable: true,
            })
            .respond(503, "unavailable")
            .respond(200, json!({ "message": "SUCCESS" }).to_string());
        let client = SheetClient::with_transport(&api_config(3), transport);
        let rows = vec![NewRow::to_bottom(vec![NewCell::new(1, "ProjA")])];

        let ack = client.add_rows("9", &rows).await.unwrap();
        assert_eq!(ack.message, "SUCCESS");
        assert_eq!(client.transport.requests().len(), 3);
    }

    #[test]
    fn test_duplicate_warning_only_for_writes() {
        let request = |method| HttpRequest {
            method,
            url: "https://api.example.test/2.0/sheets/9/rows".into(),
            path: "sheets/9/rows".into(),
            bearer_token: "tok".into(),
            body: None,
        };
        let timeout = ApiError::Transport {
            method: "POST".into(),
            path: "sheets/9/rows".into(),
            message: "operation timed out".into(),
            retryable: true,
        };
        let unavailable = ApiError::status("POST", "sheets/9/rows", 503, "");

        type Client = SheetClient<ScriptedTransport>;
        assert!(Client::warn_before_retry(&request(Method::Post), &timeout, 1));
        assert!(Client::warn_before_retry(&request(Method::Post), &unavailable, 2));
        assert!(!Client::warn_before_retry(&request(Method::Get), &unavailable, 1));
    }
}
