//! Route table
//!
//! Maps each method and path onto one handler. The auth scope is mounted only
//! when the deployed variant enables it.

use crate::handlers::{auth, health_check, users, AppState};
use crate::types::ApiError;
use actix_web::{web, HttpResponse};

/// Register the state and every route of the facade
pub fn configure_app(cfg: &mut web::ServiceConfig, state: AppState) {
    let variant = state.variant;

    cfg.app_data(web::Data::new(state))
        .route("/health", web::get().to(health_check))
        .service(
            web::resource("/users")
                .route(web::get().to(users::list_users))
                .route(web::post().to(users::create_user)),
        );

    if variant.auth_routes_enabled() {
        cfg.service(
            web::scope("/auth")
                .route("/register", web::post().to(auth::register))
                .route("/login", web::post().to(auth::login)),
        );
    }

    cfg.default_service(web::to(not_found));
}

async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound)
}
