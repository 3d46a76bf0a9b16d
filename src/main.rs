use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use quizgate_server::{
    app_state::AppState,
    auth::middleware::AuthGate,
    config::Config,
    handlers::{logout, me, refresh_token, token_info, validate_refresh_token, validate_token},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let host = config.web_server_host.clone();
    let port = config.web_server_port;

    // A missing or weak signing secret is fatal: refuse to serve
    // authenticated routes instead of running with a weak key.
    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Refusing to start: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    log::info!("Starting auth gate on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&state.config.cors_origin)
            .allow_any_method()
            .allow_any_header();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::from(Arc::clone(&state.validator)))
            .wrap(AuthGate)
            .wrap(Logger::default())
            .wrap(cors)
            .service(refresh_token)
            .service(validate_token)
            .service(validate_refresh_token)
            .service(token_info)
            .service(logout)
            .service(me)
    })
    .bind((host, port))?
    .run()
    .await
}
