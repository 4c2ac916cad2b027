//! Users table endpoints
//!
//! `GET /users` lists every row ordered by id. `POST /users` inserts one row;
//! in the full variant the caller must present a bearer token the identity
//! provider accepts, and the token is checked before the body is looked at.

use super::{log_provider_failure, parse_body, provider_failure, AppState};
use crate::models::{AuthenticatedUser, CreateUserRequest};
use crate::provider::BackendClient;
use crate::types::ApiError;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, HttpRequest, HttpResponse};

const BEARER_PREFIX: &str = "Bearer ";

/// List all users, ordered by `id` ascending by the provider
pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let users = state
        .backend
        .list_users()
        .await
        .inspect_err(|e| log_provider_failure("listing users", e))?;

    Ok(HttpResponse::Ok().json(users))
}

/// Create a user row and return the inserted rows
pub async fn create_user(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    if state.variant.requires_token_for_create() {
        let user = authenticate(&req, state.backend.as_ref()).await?;
        log::debug!("user creation authorized for {}", user.id);
    }

    let request: CreateUserRequest = parse_body(&body)?;
    let row = request.into_row(state.variant)?;

    let inserted = state
        .backend
        .insert_users(std::slice::from_ref(&row))
        .await
        .inspect_err(|e| log_provider_failure("inserting user", e))?;

    Ok(HttpResponse::Ok().json(inserted))
}

/// Extract the bearer token from the `Authorization` header
fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolve the caller through the identity provider
async fn authenticate(
    req: &HttpRequest,
    backend: &dyn BackendClient,
) -> Result<AuthenticatedUser, ApiError> {
    let token = bearer_token(req).ok_or(ApiError::Unauthorized)?;

    match backend.get_user(token).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => {
            log::debug!("bearer token resolved to no user");
            Err(ApiError::InvalidToken)
        },
        // 4xx: the token itself was refused
        Err(e) if e.status.is_some_and(|status| (400..500).contains(&status)) => {
            log::debug!("{}", provider_failure("token check", &e));
            Err(ApiError::InvalidToken)
        },
        Err(e) => {
            log_provider_failure("token check", &e);
            Err(ApiError::InvalidToken)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_bearer_token_extraction() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer abc.def"))
            .to_http_request();
        assert_eq!(bearer_token(&req), Some("abc.def"));
    }

    #[test]
    fn test_missing_or_malformed_header() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(bearer_token(&req), None);

        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);

        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer "))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);
    }
}
