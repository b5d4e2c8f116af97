//! Smartsheet REST API client
//!
//! Covers the two calls the migration needs: reading a sheet and appending
//! rows to one. Requests go through a pluggable transport and a bounded
//! retry policy.

pub mod client;
pub mod error;
pub mod models;
pub mod resilience;
pub mod transport;

pub use client::SheetClient;
pub use error::ApiError;
pub use models::{AddRowsResult, Cell, Column, NewCell, NewRow, Row, Sheet};
pub use resilience::{MonitoringConfig, ResilienceConfig, RetryConfig, RetryPolicy, RetryableError};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport};
