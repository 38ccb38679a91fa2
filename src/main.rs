use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use stayfinder_api::{config::AppConfig, routes, state::AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    log::info!("Application starting...");

    let config = AppConfig::from_env();
    let (host, port) = (config.host.clone(), config.port);
    log::info!(
        "Simulated delays: send {:?}, verify {:?}, complete {:?}, review {:?}",
        config.delays.send_code,
        config.delays.verify_code,
        config.delays.complete_booking,
        config.delays.submit_review
    );

    let state = web::Data::new(AppState::new(config));
    log::info!("Loaded {} hotels", state.catalog.hotels.len());
    log::info!("Attempting to bind to {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
