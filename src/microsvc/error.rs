//! Errors a dispatch can end in, with the HTTP status each maps to.

use thiserror::Error;

use crate::error::MarketError;
use crate::model::ModelError;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    /// The input did not deserialize into the handler's `Input`.
    #[error("Invalid request body: {0}")]
    DecodeFailed(String),
    /// A required field was absent; carries the command name.
    #[error("Missing required fields for {0}")]
    GuardRejected(String),
    /// No caller identity, or one that does not resolve to an account.
    #[error("{0}")]
    Unauthenticated(String),
    #[error(transparent)]
    Market(#[from] MarketError),
}

impl From<ModelError> for HandlerError {
    fn from(err: ModelError) -> Self {
        HandlerError::Market(MarketError::Persistence(err))
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::DecodeFailed(err.to_string())
    }
}

impl HandlerError {
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::UnknownCommand(_) => 404,
            HandlerError::DecodeFailed(_) | HandlerError::GuardRejected(_) => 400,
            HandlerError::Unauthenticated(_) => 401,
            HandlerError::Market(err) => err.status_code(),
        }
    }
}
