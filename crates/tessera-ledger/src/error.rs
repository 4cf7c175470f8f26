//! Error types for ledger access.

use thiserror::Error;

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors from the ledger client.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger unreachable: {0}")]
    Unreachable(String),

    #[error("ledger request timed out")]
    Timeout,

    #[error("malformed ledger response: {0}")]
    InvalidResponse(String),

    #[error("commitment rejected by ledger: {0}")]
    Rejected(String),
}

impl LedgerError {
    /// Whether retrying the same request can reasonably succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, LedgerError::Unreachable(_) | LedgerError::Timeout)
    }
}
