//! HTTP client module
//!
//! Provides the HTTP transport with retry and backoff strategies.
//!
//! # Features
//!
//! - **Automatic Retries**: Configurable retry logic for throttling, 5xx and timeouts
//! - **Backoff Strategies**: Constant, linear, and exponential backoff
//! - **Fast Connect Failures**: Connection and DNS errors are never retried

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
