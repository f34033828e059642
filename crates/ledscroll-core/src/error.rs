use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Nothing to compose; callers treat this as "not prepared".
    #[error("No content to scroll")]
    EmptyContent,

    #[error("Invalid tile: {0}")]
    InvalidTile(String),

    #[error("Display present failed: {0}")]
    Present(String),

    #[error("Data source error: {0}")]
    DataSource(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
