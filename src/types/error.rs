use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("initialization failed: {0}")]
    Initialization(String),
    #[error("grid map engine is not initialized")]
    NotInitialized,
    #[error("out of bounds: {0}")]
    OutOfBounds(String),
    #[error("dataset error: {0}")]
    Dataset(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, MapError>;
