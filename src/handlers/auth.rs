//! Registration and login, delegated to the identity provider

use super::{log_provider_failure, parse_body, AppState};
use crate::models::Credentials;
use crate::types::ApiError;
use actix_web::{web, HttpResponse};

/// Handles user registration requests.
pub async fn register(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let credentials: Credentials = parse_body(&body)?;

    let payload = state
        .backend
        .sign_up(&credentials)
        .await
        .inspect_err(|e| log_provider_failure("sign-up", e))?;

    Ok(HttpResponse::Ok().json(payload))
}

/// Handles user login requests.
pub async fn login(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, ApiError> {
    let credentials: Credentials = parse_body(&body)?;

    let payload = state
        .backend
        .sign_in_with_password(&credentials)
        .await
        .inspect_err(|e| log_provider_failure("sign-in", e))?;

    Ok(HttpResponse::Ok().json(payload))
}
