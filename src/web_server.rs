use actix_web::{web, App, HttpResponse, HttpServer};
use serde::Deserialize;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::service::PhotoService;

#[derive(Deserialize, Debug)]
struct PhotoInfoQuery {
    path: String,
}

async fn get_photos(service: web::Data<PhotoService>) -> Result<HttpResponse, AppError> {
    log::debug!("Received request for photos");

    let photos = service.get_photos().await?;
    Ok(HttpResponse::Ok().json(photos))
}

async fn get_photo_info(
    service: web::Data<PhotoService>,
    query: web::Query<PhotoInfoQuery>,
) -> Result<HttpResponse, AppError> {
    log::debug!("Received request for photo info with query: {:?}", query);

    let photo = service.get_photo_info(&query.path)?;
    Ok(HttpResponse::Ok().json(photo))
}

pub async fn start_web_server(
    config: Arc<AppConfig>,
    service: PhotoService,
) -> std::io::Result<()> {
    let port = config.web_port;
    let service_data = web::Data::new(service);

    log::info!("Starting web server on port: {}", port);

    HttpServer::new(move || {
        App::new()
            .app_data(service_data.clone())
            .service(web::resource("/photos").to(get_photos))
            .service(web::resource("/photos/photo").to(get_photo_info))
    })
    .bind(format!("0.0.0.0:{}", port))?
    .run()
    .await
}
