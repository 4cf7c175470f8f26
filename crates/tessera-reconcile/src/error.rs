//! Error types for reconciliation.

use thiserror::Error;

use tessera_core::ValidationError;

/// Result type for reconciliation.
pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Errors from reconciling a snapshot.
///
/// Ledger faults are not errors here. Reconciliation degrades them to an
/// unknown spend status so a wallet can still report what it knows
/// locally; only a snapshot that fails validation aborts the call.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
