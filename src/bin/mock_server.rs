//! Mock server for development
//! Serves the facade over an in-memory backend, no hosted project needed

use p_prueba_api::config::{load_allowed_origin, load_server_config_from, load_variant_from};
use p_prueba_api::mocks::MockBackend;
use p_prueba_api::models::NewUserRow;
use p_prueba_api::{server, AppState};
use std::env;
use std::process;
use std::sync::Arc;

const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "demo-password";

fn demo_row(name: &str, email: &str, role: &str) -> NewUserRow {
    NewUserRow {
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
        role: Some(role.to_string()),
    }
}

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let lookup = |key: &str| match key {
        "PORT" => Some(env::var(key).unwrap_or_else(|_| "3001".to_string())),
        _ => env::var(key).ok(),
    };
    let (server_config, variant) = match (load_server_config_from(&lookup), load_variant_from(&lookup)) {
        (Ok(server_config), Ok(variant)) => (server_config, variant),
        (Err(e), _) | (_, Err(e)) => {
            log::error!("{e}");
            process::exit(1);
        },
    };
    let allowed_origin = load_allowed_origin(&lookup);

    let backend = MockBackend::with_users(vec![
        demo_row("Ana Torres", "ana@example.com", "admin"),
        demo_row("Luis Pérez", "luis@example.com", "user"),
    ]);
    let token = backend.register_account(DEMO_EMAIL, DEMO_PASSWORD);

    println!("Mock Server started on http://{}", server_config.bind_address());
    println!("\nAvailable endpoints ({variant} variant):");
    println!("GET  /health");
    if variant.auth_routes_enabled() {
        println!("POST /auth/register");
        println!("POST /auth/login    (demo account: {DEMO_EMAIL} / {DEMO_PASSWORD})");
    }
    println!("GET  /users");
    println!("POST /users");
    if variant.requires_token_for_create() {
        println!("\nDemo bearer token: {token}");
    }
    println!("\nBackend: MOCKED - state is kept in memory and lost on exit");

    let state = AppState::new(Arc::new(backend), variant);
    if let Err(e) = server::run(&server_config, &allowed_origin, state).await {
        log::error!("{e}");
        process::exit(1);
    }
}
