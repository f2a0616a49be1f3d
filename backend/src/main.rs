mod config;
mod error;
mod federation;
mod fetcher;
mod polling;
mod services;
mod store;

use crate::config::ServerConfig;
use crate::federation::FederationCore;
use crate::fetcher::HttpFetcher;
use crate::store::SqliteCatalogStore;
use actix_web::{web, App, HttpServer};
use clap::Parser;
use env_logger::Env;
use log::{debug, info};
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = ServerConfig::parse();
    let url = config.url();

    let polling = config.polling().map_err(io::Error::other)?;
    let fetcher = HttpFetcher::new(config.fetch_timeout().map_err(io::Error::other)?)
        .map_err(io::Error::other)?;
    let store = SqliteCatalogStore::open(&config.database).map_err(io::Error::other)?;
    info!("Catalog stored in {}", config.database.display());

    let core = web::Data::new(FederationCore::new(
        Arc::new(store),
        Arc::new(fetcher),
        polling,
    ));

    core.on_session_state_changed(|session| info!("Polling session changed: {:?}", session));
    core.on_reading_appended(|target_id, reading| {
        debug!("{} returned {} records", target_id, reading.payload.len())
    });

    if config.open_browser {
        let url_clone = url.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(500));
            let _ = webbrowser::open(&format!("{}/api/catalog", url_clone));
        });
    }

    info!(
        "Server running at {} (poll every {:?}, keep {} readings)",
        url, polling.interval, polling.history_capacity
    );

    let app_core = core.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(10 * 1024 * 1024)) // 10 MB
            .app_data(app_core.clone())
            .service(services::catalog::configure_routes())
            .service(services::compliance::configure_routes())
            .service(services::polling::configure_routes())
            .service(services::federation::configure_routes())
    })
        .bind((config.host.as_str(), config.port))?
        .run()
        .await?;

    core.shutdown();
    info!("Polling stopped, server shut down");
    Ok(())
}
