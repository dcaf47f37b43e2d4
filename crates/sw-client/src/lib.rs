//! HTTP access to the remote record service.

use thiserror::Error;

use sw_core::{DomainError, RepositoryError};

mod client;
mod config;
mod repository;

pub use client::RecordClient;
pub use config::{ClientConfig, API_URL_ENV, CONFIG_DIR_NAME, DEFAULT_API_URL};
pub use repository::HttpRecordRepository;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors returned by the record service client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service refused the supplied credentials.
    #[error("login rejected by the record service")]
    Unauthorized,
    /// An authenticated call was made before logging in.
    #[error("not logged in to the record service")]
    NotAuthenticated,
    /// The service answered with a non-success status.
    #[error("record service returned {status}: {body}")]
    Status { status: u16, body: String },
    /// The request could not be sent or the response could not be read.
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
    /// The configured base URL is not usable.
    #[error("invalid service url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// A listed record failed domain validation.
    #[error("invalid record payload: {0}")]
    InvalidPayload(#[from] DomainError),
    /// Reading or writing the configuration failed.
    #[error("config error: {0}")]
    Config(String),
    /// The blocking runtime could not be started.
    #[error("runtime error: {0}")]
    Runtime(#[source] std::io::Error),
}

impl From<ClientError> for RepositoryError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Unauthorized => Self::Unauthorized,
            ClientError::NotAuthenticated => Self::NotAuthenticated,
            ClientError::Status { status, body } => Self::Status { status, body },
            ClientError::InvalidPayload(err) => Self::InvalidPayload(err),
            other => Self::Transport(other.to_string()),
        }
    }
}
