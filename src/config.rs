//! Configuration management for p_prueba_api
//!
//! Loads the app configuration from environment variables. The two backend
//! credentials are required; everything else has a default.

use crate::types::{ApiVariant, AppConfig, StartupError, ServerConfig, SupabaseConfig};
use std::env;

/// Load complete app configuration from the process environment
pub fn load_config() -> Result<AppConfig, StartupError> {
    load_config_from(|key| env::var(key).ok())
}

/// Load configuration through an arbitrary key lookup
pub fn load_config_from<F>(lookup: F) -> Result<AppConfig, StartupError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = AppConfig {
        supabase: load_supabase_config(&lookup)?,
        server: load_server_config_from(&lookup)?,
        allowed_origin: load_allowed_origin(&lookup),
        variant: load_variant_from(&lookup)?,
    };

    Ok(config)
}

/// Load the backend credentials (both required)
fn load_supabase_config<F>(lookup: &F) -> Result<SupabaseConfig, StartupError>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(SupabaseConfig {
        url: required(lookup, "SUPABASE_URL")?,
        anon_key: required(lookup, "SUPABASE_ANON_KEY")?,
    })
}

/// Load listener configuration
pub fn load_server_config_from<F>(lookup: &F) -> Result<ServerConfig, StartupError>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = ServerConfig::default();

    let port = match non_empty(lookup, "PORT") {
        Some(raw) => raw
            .parse()
            .map_err(|_| StartupError::Config(format!("PORT must be a valid port number, got {raw:?}")))?,
        None => defaults.port,
    };

    Ok(ServerConfig {
        host: non_empty(lookup, "HOST").unwrap_or(defaults.host),
        port,
    })
}

/// Load the CORS origin, `*` when unset
pub fn load_allowed_origin<F>(lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, "ALLOWED_ORIGIN").unwrap_or_else(|| "*".to_string())
}

/// Load the deployed variant, `full` when unset
pub fn load_variant_from<F>(lookup: &F) -> Result<ApiVariant, StartupError>
where
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup, "API_VARIANT") {
        Some(raw) => ApiVariant::parse(&raw).ok_or_else(|| {
            StartupError::Config(format!("API_VARIANT must be 'full' or 'reduced', got {raw:?}"))
        }),
        None => Ok(ApiVariant::default()),
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, StartupError>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, key)
        .ok_or_else(|| StartupError::Config(format!("{key} environment variable is required")))
}

// Empty values count as unset.
fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
