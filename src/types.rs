//! Type definitions for p_prueba_api
//!
//! Contains the shared error types and configuration models used throughout
//! the app.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;
use thiserror::Error;

/// Application startup errors
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Backend client error: {0}")]
    Client(String),
    #[error("Server binding error: {0}")]
    ServerBind(String),
}

/// Runtime API errors, rendered as `{"error": <message>}`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("invalid token")]
    InvalidToken,
    #[error("{0}")]
    MissingFields(&'static str),
    #[error("{0}")]
    BadRequest(String),
    /// Message reported by the identity or storage provider, passed through verbatim
    #[error("{0}")]
    Provider(String),
    #[error("not found")]
    NotFound,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized | ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::MissingFields(_) | ApiError::BadRequest(_) | ApiError::Provider(_) => {
                StatusCode::BAD_REQUEST
            },
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}

/// Which flavour of the facade is deployed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiVariant {
    /// Auth endpoints enabled, user creation requires a bearer token
    #[default]
    Full,
    /// No auth endpoints, open user creation with `name` and `email` only
    Reduced,
}

impl ApiVariant {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" => Some(ApiVariant::Full),
            "reduced" => Some(ApiVariant::Reduced),
            _ => None,
        }
    }

    pub fn auth_routes_enabled(self) -> bool {
        matches!(self, ApiVariant::Full)
    }

    pub fn requires_token_for_create(self) -> bool {
        matches!(self, ApiVariant::Full)
    }

    /// Error text returned when `name` or `email` is missing on user creation
    pub fn missing_fields_message(self) -> &'static str {
        match self {
            ApiVariant::Full => "missing required fields",
            ApiVariant::Reduced => "missing fields: name, email",
        }
    }
}

impl fmt::Display for ApiVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiVariant::Full => write!(f, "full"),
            ApiVariant::Reduced => write!(f, "reduced"),
        }
    }
}

/// Complete app configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase: SupabaseConfig,
    pub server: ServerConfig,
    pub allowed_origin: String,
    pub variant: ApiVariant,
}

/// Connection settings for the hosted backend
#[derive(Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

impl fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("anon_key", &"***")
            .finish()
    }
}

/// Listener configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}
