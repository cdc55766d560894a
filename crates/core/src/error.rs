//! Error types for the Stylecast domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for all Stylecast operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Profile errors ---
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Coarse classification of a remote failure, surfaced to callers as a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network trouble, timeouts, rate limits and 5xx answers.
    Transient,
    /// The credential was rejected or is not configured.
    Auth,
    /// Anything else the provider refused or garbled.
    Api,
}

impl ProviderError {
    /// Tag this failure as transient, auth or api.
    pub fn kind(&self) -> FailureKind {
        match self {
            ProviderError::RateLimited { .. }
            | ProviderError::Timeout(_)
            | ProviderError::Network(_) => FailureKind::Transient,
            ProviderError::ApiError { status_code, .. } if *status_code >= 500 => {
                FailureKind::Transient
            }
            ProviderError::AuthenticationFailed(_) | ProviderError::NotConfigured(_) => {
                FailureKind::Auth
            }
            ProviderError::ApiError { .. } | ProviderError::MalformedResponse(_) => {
                FailureKind::Api
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Failed to read profile at {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to write profile at {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("Failed to parse profile at {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn profile_error_displays_path() {
        let err = Error::Profile(ProfileError::Write {
            path: PathBuf::from("/tmp/profile.json"),
            reason: "read-only file system".into(),
        });
        assert!(err.to_string().contains("/tmp/profile.json"));
        assert!(err.to_string().contains("read-only"));
    }

    #[test]
    fn failure_kinds() {
        assert_eq!(
            ProviderError::Network("reset".into()).kind(),
            FailureKind::Transient
        );
        assert_eq!(
            ProviderError::RateLimited { retry_after_secs: 5 }.kind(),
            FailureKind::Transient
        );
        assert_eq!(
            ProviderError::ApiError {
                status_code: 503,
                message: "overloaded".into()
            }
            .kind(),
            FailureKind::Transient
        );
        assert_eq!(
            ProviderError::AuthenticationFailed("bad key".into()).kind(),
            FailureKind::Auth
        );
        assert_eq!(
            ProviderError::ApiError {
                status_code: 400,
                message: "bad request".into()
            }
            .kind(),
            FailureKind::Api
        );
        assert_eq!(
            ProviderError::MalformedResponse("not json".into()).kind(),
            FailureKind::Api
        );
    }
}
