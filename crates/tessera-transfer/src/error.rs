//! Error types for the transfer protocol.

use thiserror::Error;

use tessera_core::{Digest, ValidationError};
use tessera_ledger::LedgerError;

/// Result type for transfer operations.
pub type Result<T> = std::result::Result<T, TransferError>;

/// Errors from preparing, sending, or completing a transfer.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The snapshot failed structural or cryptographic validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The supplied credentials do not control the token.
    ///
    /// Deliberately carries no detail; callers get the same error whether
    /// the key, the nonce, or the masking mode was wrong.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The sender committed to recipient state data that was not supplied.
    #[error("transfer commits to state data that was not supplied")]
    MissingStateData,

    /// Supplied state data hashes to something other than the sender's
    /// commitment.
    #[error("state data does not match the sender's commitment")]
    DataCommitmentMismatch,

    /// The current state is already spent by a recorded transaction.
    #[error("token already spent from its current state")]
    AlreadySpent,

    /// A prepared transfer is already attached to the snapshot.
    #[error("a transfer is already pending for this token")]
    TransferPending,

    /// There is no pending transfer to complete.
    #[error("no pending transfer to complete")]
    NoPendingTransfer,

    /// The ledger holds a different transaction for this state.
    #[error("state already spent by transaction {existing}")]
    DoubleSpend { existing: Digest },

    /// The ledger never included the commitment within the deadline.
    #[error("timed out waiting for an inclusion proof")]
    ProofTimeout,

    /// The ledger could not be reached or rejected the request.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
