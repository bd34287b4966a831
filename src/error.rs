use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("FTP connection error: {0}")]
    Connection(String),

    #[error("FTP listing error: {0}")]
    Listing(String),

    #[error("Name decoding error: {0}")]
    Decoding(String),

    #[error("No photos found on the FTP server")]
    NoResults,

    #[error("Not found: {0}")]
    NotFound(String),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({
                "error": self.to_string(),
            }))
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Connection(_) => StatusCode::BAD_GATEWAY,
            AppError::Listing(_) => StatusCode::BAD_GATEWAY,
            AppError::Decoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NoResults => StatusCode::NOT_FOUND,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}
