use p_prueba_api::config::load_config;
use p_prueba_api::provider::{BackendClient, SupabaseClient};
use p_prueba_api::{server, AppState};
use std::process;
use std::sync::Arc;

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // No listener is opened without both backend credentials.
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            process::exit(1);
        },
    };

    let backend: Arc<dyn BackendClient> =
        match SupabaseClient::connect(&config.supabase.url, &config.supabase.anon_key) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                log::error!("{e}");
                process::exit(1);
            },
        };

    log::info!("Starting {} v{}", p_prueba_api::SERVICE_NAME, p_prueba_api::VERSION);

    let state = AppState::new(backend, config.variant);
    if let Err(e) = server::run(&config.server, &config.allowed_origin, state).await {
        log::error!("{e}");
        process::exit(1);
    }
}
