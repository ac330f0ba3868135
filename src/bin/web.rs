//! Single binary web server: REST API over the tournament database.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with flags or env: HOST, PORT, DATABASE_PATH.

use actix_web::{web::Data, App, HttpServer};
use clap::Parser;
use tournament_fixtures::{api, config::Config, Store};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::parse();
    let store = Store::open(&config.database_path).map_err(|e| {
        log::error!(
            "Failed to open database {}: {e}",
            config.database_path.display()
        );
        std::io::Error::other(e.to_string())
    })?;
    log::info!("Using database {}", config.database_path.display());

    let state = Data::new(store);
    let bind = (config.host.as_str(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || App::new().app_data(state.clone()).configure(api::configure))
        .bind(bind)?
        .run()
        .await
}
