//! # Tessera
//!
//! The unified API for the Tessera system - transferable tokens owned
//! by cryptographic predicates, carried as self-contained snapshot
//! documents.
//!
//! ## Overview
//!
//! Tessera provides a portable, offline-capable library for:
//!
//! - **Tokens**: Minted assets whose ownership is a signing predicate
//! - **Snapshots**: Self-contained documents holding genesis, current
//!   state, and full transfer history
//! - **Transfers**: Signed spend commitments, handed off offline or
//!   pushed to the ledger directly
//! - **Reconciliation**: Classifying a snapshot against the ledger's
//!   ground truth
//!
//! ## Key Concepts
//!
//! - **Snapshot**: A claim, not the truth. The ledger decides which
//!   state is spent.
//! - **Request id**: Derived from owner key and state hash; registered
//!   at most once, which is what makes double spends detectable.
//! - **Masked predicate**: A per-token subkey bound to a nonce, keeping
//!   the owner's long-term key out of the token's history.
//! - **Offline artifact**: A snapshot carrying a pending transfer; the
//!   recipient submits the commitment themselves.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tessera::{MintParams, Wallet, WalletConfig};
//! use tessera::core::{Ed25519Provider, OwnerCredentials, SecretSeed, TokenType};
//! use tessera::ledger::InMemoryAggregator;
//!
//! async fn example() {
//!     let aggregator = InMemoryAggregator::new();
//!     let config = WalletConfig::new(aggregator.trust_anchor());
//!     let wallet = Wallet::new(aggregator, Ed25519Provider::new(), config);
//!
//!     let alice = OwnerCredentials::unmasked(SecretSeed::random());
//!     let params = MintParams::new(TokenType::from_name("concert-ticket"));
//!     let snapshot = wallet.mint(params, &alice).await.unwrap();
//!
//!     // Hand the token off, then later check where it stands.
//!     // let artifact = wallet.prepare_offline(&snapshot, &alice, &bob_address, options)?;
//!     // let report = wallet.reconcile(&snapshot).await?;
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `tessera::core` - Core primitives (snapshots, predicates, proofs)
//! - `tessera::ledger` - Ledger client trait and in-memory aggregator
//! - `tessera::transfer` - Transfer protocol engine
//! - `tessera::reconcile` - Reconciliation engine and scenarios

pub mod document;
pub mod error;
pub mod wallet;

// Re-export component crates
pub use tessera_core as core;
pub use tessera_ledger as ledger;
pub use tessera_reconcile as reconcile;
pub use tessera_transfer as transfer;

// Re-export main types for convenience
pub use document::{load_snapshot, save_snapshot};
pub use error::{Result, TesseraError};
pub use wallet::{MintParams, Wallet, WalletConfig};

// Re-export commonly used component types
pub use tessera_core::{
    Address, CoinData, CoinId, Digest, Ed25519Provider, OwnerCredentials, Predicate, Salt,
    SecretSeed, SnapshotStatus, TokenId, TokenSnapshot, TokenType, TrustAnchor,
};
pub use tessera_ledger::{InMemoryAggregator, LedgerClient};
pub use tessera_reconcile::{OwnershipScenario, ReconcileReport, SpendStatus};
pub use tessera_transfer::{ReceiveOptions, TransferOptions};
