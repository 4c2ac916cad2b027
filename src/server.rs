//! HTTP server assembly shared by the service and the mock server

use crate::handlers::AppState;
use crate::routes::configure_app;
use crate::types::{ServerConfig, StartupError};
use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::{Logger, NormalizePath};
use actix_web::{App, HttpServer};

/// Build the CORS policy for `origin`; `*` allows any origin
pub fn build_cors(origin: &str) -> Cors {
    let cors = if origin == "*" {
        Cors::default().allow_any_origin().send_wildcard()
    } else {
        Cors::default().allowed_origin(origin)
    };

    cors.allow_any_method().allow_any_header()
}

/// Assemble the application: routes, request logging, CORS, and trailing
/// slash normalisation so `/users/` reaches the same handlers as `/users`.
pub fn build_app(
    state: AppState,
    allowed_origin: &str,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(Logger::default())
        .wrap(build_cors(allowed_origin))
        .wrap(NormalizePath::trim())
        .configure(move |cfg| configure_app(cfg, state))
}

/// Bind the listener and serve until shutdown
pub async fn run(
    server: &ServerConfig,
    allowed_origin: &str,
    state: AppState,
) -> Result<(), StartupError> {
    let bind_address = server.bind_address();
    let allowed_origin = allowed_origin.to_string();

    log::info!(
        "Serving {} ({} variant) on {} with CORS origin {}",
        crate::SERVICE_NAME,
        state.variant,
        bind_address,
        allowed_origin
    );

    HttpServer::new(move || build_app(state.clone(), &allowed_origin))
    .bind(&bind_address)
    .map_err(|e| StartupError::ServerBind(format!("{bind_address}: {e}")))?
    .run()
    .await
    .map_err(|e| StartupError::ServerBind(e.to_string()))
}
