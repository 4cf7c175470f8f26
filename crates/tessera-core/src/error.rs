//! Error types for Tessera core.

use thiserror::Error;

/// Low-level cryptographic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,
}

/// A snapshot document could not be parsed.
///
/// Distinct from [`ValidationError`]: a document that parses but is
/// internally inconsistent is a validation failure, not a parse failure.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid snapshot document: {0}")]
    Json(#[from] serde_json::Error),
}

/// A snapshot parsed but is internally inconsistent.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("unsupported snapshot version: {0}")]
    UnsupportedVersion(u8),

    #[error("malformed predicate: {0}")]
    MalformedPredicate(String),

    #[error("state hash does not match state data and predicate")]
    StateHashMismatch,

    #[error("token id does not match its type and salt")]
    TokenIdMismatch,

    #[error("genesis proof does not commit to the genesis record")]
    GenesisHashMismatch,

    #[error("request id is not derivable from the authenticator")]
    RequestIdMismatch,

    #[error("signature verification failed")]
    SignatureFailed,

    #[error("transaction {index} hash does not match its transfer data")]
    TransactionHashMismatch { index: usize },

    #[error("transaction {index} authenticator does not cover its source state")]
    SourceStateMismatch { index: usize },

    #[error("transaction {index} inclusion proof does not match its commitment")]
    ProofMismatch { index: usize },

    #[error("pending transfer hash does not match its transfer data")]
    PendingHashMismatch,

    #[error("pending transfer does not spend the current state")]
    PendingSourceMismatch,

    #[error("pending transfer sender does not match its commitment")]
    PendingSenderMismatch,

    #[error("pending transfer was not signed by the current owner")]
    PendingOwnerMismatch,

    #[error("proof certificate failed verification against the trust anchor")]
    CertificateInvalid,
}

/// Errors loading a snapshot document: parse or validation.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
