//! LLM Provider implementations for Stylecast.
//!
//! All providers implement the `stylecast_core::Provider` trait.
//! The router selects the correct provider based on configuration.

pub mod anthropic;
pub mod demo;
pub mod openai_compat;
pub mod router;

pub use anthropic::AnthropicProvider;
pub use demo::DemoProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use router::ProviderRouter;

use std::time::Duration;
use stylecast_core::error::ProviderError;

/// Fallback when the server sends no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

/// Build the shared HTTP client with the configured request timeout.
pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
}

/// Map a transport failure to a provider error, keeping timeouts distinct.
pub(crate) fn map_send_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(e.to_string())
    } else {
        ProviderError::Network(e.to_string())
    }
}

/// Seconds to wait according to a `Retry-After` header.
pub(crate) fn retry_after(headers: &reqwest::header::HeaderMap) -> u64 {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}
