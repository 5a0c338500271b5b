//! Session-level error taxonomy.

use thiserror::Error;

/// Why a transfer was rejected before touching the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing fields")]
    MissingFields,

    #[error("invalid address")]
    InvalidAddress,

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("non-positive amount")]
    NonPositiveAmount,
}

/// Errors surfaced by session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Every configured endpoint failed its liveness check.
    #[error(
        "could not connect to {network}: no endpoint reachable; if requests are blocked by CORS, \
         serve the wallet through a local server or proxy"
    )]
    NoEndpointReachable { network: String },

    #[error("invalid private key: {0}")]
    InvalidKeyFormat(String),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("insufficient funds for transaction")]
    InsufficientFunds,

    #[error("transaction failed: {0}")]
    Broadcast(String),

    #[error("failed to fetch balance: {0}")]
    BalanceQuery(String),

    #[error("an account is already active; log out first")]
    AlreadyAuthenticated,

    #[error("no active account")]
    NotAuthenticated,
}

/// Classify a failed send by its underlying message.
pub fn classify_failure(message: &str) -> SessionError {
    if message.to_lowercase().contains("insufficient funds") {
        SessionError::InsufficientFunds
    } else {
        SessionError::Broadcast(message.to_string())
    }
}
