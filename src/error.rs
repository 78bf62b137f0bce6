//! Client error type

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Raised before any request is made
    #[error("id is required.")]
    MissingId,

    /// Transport failure, non-success status, or an undecodable body.
    /// `message` is the server's `error` text when it sent one.
    #[error("{message}")]
    Server { status: Option<u16>, message: String },
}

impl ServiceError {
    /// HTTP status of the failed response, if one arrived
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::MissingId => None,
            ServiceError::Server { status, .. } => *status,
        }
    }
}
