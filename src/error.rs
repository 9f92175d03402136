use thiserror::Error;

use crate::model::ModelError;
use crate::notify::NotificationError;
use crate::orders::OrderStatus;

/// Errors raised by the storefront services.
///
/// Everything except `Persistence`, `Hashing` and `Notification` is detected
/// before the operation writes anything.
#[derive(Debug, Error)]
pub enum MarketError {
    /// Malformed or missing input (empty cart, bad rating, unknown status).
    #[error("{0}")]
    Validation(String),
    /// A referenced record does not exist.
    #[error("{kind} not found")]
    NotFound { kind: &'static str, id: String },
    /// The actor may not perform this action on this record.
    #[error("{0}")]
    NotAuthorized(String),
    /// The order cannot move from `from` to `to`.
    #[error("{}", describe_transition(*from, *to))]
    InvalidStateTransition { from: OrderStatus, to: OrderStatus },
    /// A blocked account tried to authenticate.
    #[error("Your account has been suspended. Please contact support.")]
    AccountSuspended,
    #[error("Invalid email or password")]
    InvalidCredentials,
    /// A uniqueness rule would be broken (duplicate email).
    #[error("{0}")]
    Conflict(String),
    #[error("storage failure: {0}")]
    Persistence(#[from] ModelError),
    #[error("password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),
    #[error("Email could not be sent: {0}")]
    Notification(#[from] NotificationError),
    #[error("session token could not be issued: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

fn describe_transition(from: OrderStatus, to: OrderStatus) -> String {
    if to == OrderStatus::Cancelled {
        "Cannot cancel order that is no longer pending".to_string()
    } else {
        format!("Cannot move order from {} to {}", from, to)
    }
}

impl MarketError {
    pub fn validation(message: impl Into<String>) -> Self {
        MarketError::Validation(message.into())
    }

    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        MarketError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn not_authorized(message: impl Into<String>) -> Self {
        MarketError::NotAuthorized(message.into())
    }

    /// HTTP-style status code for this error kind.
    pub fn status_code(&self) -> u16 {
        match self {
            MarketError::Validation(_)
            | MarketError::InvalidStateTransition { .. }
            | MarketError::Conflict(_) => 400,
            MarketError::NotAuthorized(_) | MarketError::InvalidCredentials => 401,
            MarketError::AccountSuspended => 403,
            MarketError::NotFound { .. } => 404,
            MarketError::Persistence(_)
            | MarketError::Hashing(_)
            | MarketError::Notification(_)
            | MarketError::Token(_) => 500,
        }
    }
}
