//! HTTP handlers

pub mod auth;
pub mod health;
pub mod users;

use crate::provider::{BackendClient, ProviderError};
use crate::types::{ApiError, ApiVariant};
use serde::de::DeserializeOwned;
use std::sync::Arc;

// Re-export for convenience
pub use health::health_check;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn BackendClient>,
    pub variant: ApiVariant,
}

impl AppState {
    pub fn new(backend: Arc<dyn BackendClient>, variant: ApiVariant) -> Self {
        Self {
            backend,
            variant,
        }
    }
}

/// Parse a JSON request body. An empty body reads as `{}`.
pub(crate) fn parse_body<T>(body: &[u8]) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {e}")))
}

/// One-line account of a failed provider call for the logs
pub(crate) fn provider_failure(operation: &str, err: &ProviderError) -> String {
    match err.status {
        Some(status) => format!("{operation} rejected by provider (HTTP {status}): {}", err.message),
        None => format!("{operation} failed before the provider answered: {}", err.message),
    }
}

pub(crate) fn log_provider_failure(operation: &str, err: &ProviderError) {
    log::warn!("{}", provider_failure(operation, err));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Credentials;

    #[test]
    fn test_provider_failure_reports_status() {
        let err = ProviderError::with_status(422, "User already registered");
        assert_eq!(
            provider_failure("sign-up", &err),
            "sign-up rejected by provider (HTTP 422): User already registered"
        );

        let err = ProviderError::new("error sending request");
        assert_eq!(
            provider_failure("listing users", &err),
            "listing users failed before the provider answered: error sending request"
        );
    }

    #[test]
    fn test_parse_empty_body_as_default() {
        let credentials: Credentials = parse_body(b"").unwrap();
        assert_eq!(credentials, Credentials::default());

        let credentials: Credentials = parse_body(b"  \n").unwrap();
        assert_eq!(credentials, Credentials::default());
    }

    #[test]
    fn test_parse_malformed_body() {
        let err = parse_body::<Credentials>(b"{\"email\":").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref msg) if msg.starts_with("invalid JSON body")));
    }
}
