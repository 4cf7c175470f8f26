//! # Tessera Core
//!
//! Pure primitives for Tessera: token snapshots, predicates, spend
//! commitments, and proofs.
//!
//! This crate contains no I/O and no networking. It is pure computation
//! over cryptographic data structures; the ledger and the wider protocol
//! live in the sibling crates.
//!
//! ## Key Types
//!
//! - [`TokenSnapshot`] - The self-contained token document two parties exchange
//! - [`TokenState`] - The current `(data, predicate)` pair and its hash
//! - [`Predicate`] - The owner's spending condition (masked or unmasked)
//! - [`Commitment`] - A spend commitment as submitted to the ledger
//! - [`RequestId`] - The ledger lookup key, derived from `(owner, state hash)`
//!
//! ## Canonicalization
//!
//! State, transfer, and genesis records hash over deterministic CBOR.
//! See [`canonical`].

pub mod canonical;
pub mod crypto;
pub mod error;
pub mod predicate;
pub mod proof;
pub mod provider;
mod serde_hex;
pub mod snapshot;
pub mod state;
pub mod transaction;
pub mod types;
pub mod validation;

pub use canonical::{
    canonical_genesis_bytes, canonical_state_bytes, canonical_transfer_bytes, genesis_hash,
    state_hash, transfer_hash,
};
pub use crypto::{Digest, Keypair, PublicKey, SecretSeed, Signature};
pub use error::{CoreError, ParseError, SnapshotError, ValidationError};
pub use predicate::{Predicate, PredicateKind, SignatureAlgorithm};
pub use proof::{ExclusionProof, InclusionProof, TrustAnchor};
pub use provider::{CryptoProvider, Ed25519Provider, OwnerCredentials};
pub use snapshot::{
    GenesisData, GenesisRecord, SnapshotStatus, TokenSnapshot, SNAPSHOT_VERSION,
};
pub use state::TokenState;
pub use transaction::{
    Authenticator, Commitment, PendingTransfer, TransferData, TransferTransaction,
};
pub use types::{
    Address, CoinData, CoinId, Nonce, RequestId, Salt, StateHash, TokenId, TokenType,
};
pub use validation::{validate_snapshot, validate_snapshot_with_anchor};
