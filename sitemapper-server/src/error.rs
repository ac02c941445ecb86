use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sitemapper_scanner::ScanError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Please provide a URL to crawl")]
    MissingUrl,

    #[error("{0}")]
    InvalidUrl(String),

    #[error("Crawler error: {0}")]
    Crawler(ScanError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ScanError> for ServerError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::InvalidUrl(msg) => ServerError::InvalidUrl(format!("Invalid URL: {}", msg)),
            other => ServerError::Crawler(other),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match self {
            ServerError::MissingUrl | ServerError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
