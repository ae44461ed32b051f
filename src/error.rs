use thiserror::Error;

#[derive(Error, Debug)]
pub enum CamError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Directory error: {0}")]
    DirectoryError(String),

    #[error("Write conflict: {0}")]
    WriteConflictError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Task error: {0}")]
    TaskError(#[from] tokio::task::JoinError),
}

impl From<reqwest::Error> for CamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            CamError::ConnectionError(e.to_string())
        } else if e.is_builder() {
            CamError::InvalidArgument(e.to_string())
        } else {
            CamError::TransportError(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, CamError>;
