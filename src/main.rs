mod config;
mod encoding;
mod error;
mod ftp;
mod listing;
mod photo;
mod service;
mod walker;
mod web_server;

use crate::config::AppConfig;
use crate::ftp::FtpSessionFactory;
use crate::listing::ListerFactory;
use crate::service::PhotoService;
use anyhow::Result;
use log::info;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::new()?;

    // Initialize env_logger based on config.log_level
    env_logger::Builder::new()
        .filter_level(config.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .init();

    info!("Starting ftp-photo-service");

    let factory: Arc<dyn ListerFactory> = Arc::new(FtpSessionFactory::new(config.clone()));
    let service = PhotoService::new(factory, config.clone());

    // Run the web server in the foreground
    if let Err(e) = web_server::start_web_server(Arc::new(config), service).await {
        log::error!("Web server error: {}", e);
    }

    info!("ftp-photo-service finished");

    Ok(())
}
