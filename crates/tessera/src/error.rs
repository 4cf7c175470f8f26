//! Error types for the wallet API.

use thiserror::Error;

use tessera_core::{Digest, SnapshotError, ValidationError};
use tessera_ledger::LedgerError;
use tessera_reconcile::ReconcileError;
use tessera_transfer::TransferError;

/// Errors from wallet operations.
#[derive(Debug, Error)]
pub enum TesseraError {
    /// Snapshot document error (parse or validation).
    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Validation error.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Transfer protocol error.
    #[error("transfer error: {0}")]
    Transfer(#[from] TransferError),

    /// Reconciliation error.
    #[error("reconcile error: {0}")]
    Reconcile(#[from] ReconcileError),

    /// Ledger access error.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Another mint already claimed this token's genesis.
    #[error("token already minted with transaction {existing}")]
    MintConflict { existing: Digest },

    /// Filesystem error while loading or saving a document.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for wallet operations.
pub type Result<T> = std::result::Result<T, TesseraError>;
