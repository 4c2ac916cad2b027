//! p_prueba_api
//!
//! A thin REST facade over a hosted backend-as-a-service: authentication
//! (sign-up, password sign-in, token lookup) and a single `users` table.
//! Built with Actix-web; the backend is reached through [`provider::BackendClient`].

pub mod config;
pub mod handlers;
pub mod mocks;
pub mod models;
pub mod provider;
pub mod routes;
pub mod server;
pub mod types;

// Re-export commonly used types and functions
pub use handlers::AppState;
pub use routes::configure_app;
pub use types::{ApiError, ApiVariant, AppConfig, StartupError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SERVICE_NAME: &str = "p_prueba_api";
