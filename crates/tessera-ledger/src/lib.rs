//! # Tessera Ledger
//!
//! Ledger abstraction for Tessera. Wallets never talk to the commitment
//! ledger directly; they go through the [`LedgerClient`] trait, which
//! this crate defines together with an in-memory aggregator and the
//! polling loop that waits for inclusion proofs.
//!
//! ## Overview
//!
//! The ledger registers spend commitments under at-most-once semantics:
//! a request id maps to exactly one transaction hash, forever. Every
//! query is answered with a signed certificate, so callers verify what
//! the ledger said rather than trusting the transport.
//!
//! ## Key Types
//!
//! - [`LedgerClient`] - The async trait for ledger access
//! - [`InMemoryAggregator`] - Single-node aggregator for tests and local use
//! - [`SubmitOutcome`] - Accepted, already-exists, or conflict
//! - [`ProofResponse`] - Signed inclusion or exclusion proof
//! - [`await_inclusion`] - Poll until a request id is included
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tessera_ledger::{InMemoryAggregator, LedgerClient, SubmitOutcome};
//!
//! async fn example() {
//!     let aggregator = InMemoryAggregator::new();
//!     let anchor = aggregator.trust_anchor();
//!
//!     // Submit a commitment built by the transfer layer.
//!     // let commitment: Commitment = ...;
//!     // let outcome = aggregator.submit_commitment(&commitment).await.unwrap();
//!     // assert_eq!(outcome, SubmitOutcome::Accepted);
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Idempotent submission**: Resubmitting an identical commitment returns `AlreadyExists`
//! - **Double-spend surfacing**: A different hash at the same request id returns `Conflict`
//! - **Certified answers**: Inclusion and exclusion proofs carry an aggregator signature
//! - **Transient-aware polling**: `await_inclusion` retries unreachable/timeout errors

pub mod client;
pub mod error;
pub mod memory;
pub mod poll;

pub use client::{LedgerClient, ProofResponse, SubmitOutcome};
pub use error::{LedgerError, Result};
pub use memory::InMemoryAggregator;
pub use poll::await_inclusion;
