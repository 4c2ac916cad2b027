//! Remote backend adapter
//!
//! Every route handler talks to the hosted identity and row-storage provider
//! through [`BackendClient`]. The production implementation is
//! [`SupabaseClient`]; tests and the development server use
//! [`crate::mocks::MockBackend`].

pub mod supabase;

use crate::models::{AuthPayload, AuthenticatedUser, Credentials, NewUserRow, UserRecord};
use crate::types::ApiError;
use async_trait::async_trait;
use thiserror::Error;

pub use supabase::SupabaseClient;

/// Name of the table behind `/users`
pub const USERS_TABLE: &str = "users";

/// Failure reported by the provider, or by the transport reaching it
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
    pub status: Option<u16>,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        ApiError::Provider(err.message)
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Operations the facade delegates to the hosted backend
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Create an account with email and password
    async fn sign_up(&self, credentials: &Credentials) -> ProviderResult<AuthPayload>;

    /// Open a session with email and password
    async fn sign_in_with_password(&self, credentials: &Credentials) -> ProviderResult<AuthPayload>;

    /// Resolve a bearer token; `Ok(None)` when the provider knows no such user
    async fn get_user(&self, token: &str) -> ProviderResult<Option<AuthenticatedUser>>;

    /// All rows of the users table, ordered by `id` ascending
    async fn list_users(&self) -> ProviderResult<Vec<UserRecord>>;

    /// Insert rows and return them as stored
    async fn insert_users(&self, rows: &[NewUserRow]) -> ProviderResult<Vec<UserRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_maps_verbatim() {
        let err = ProviderError::with_status(422, "User already registered");
        assert_eq!(err.to_string(), "User already registered");
        assert_eq!(ApiError::from(err), ApiError::Provider("User already registered".to_string()));
    }
}
