//! # Tessera Transfer
//!
//! Transfer protocol for moving token ownership between parties.
//!
//! ## Overview
//!
//! A transfer is a signed spend commitment over the token's current
//! state plus the recipient's address. The sender can push it to the
//! ledger directly (online send) or hand the whole snapshot to the
//! recipient as a pending artifact (offline transfer); in the offline
//! case the recipient submits the commitment themselves when they come
//! online, so the transfer needs no connectivity at hand-off time.
//!
//! ## Key Properties
//!
//! - **Offline hand-off**: Preparing a transfer needs no ledger access
//! - **At-most-once spend**: The ledger registers each state spend once
//! - **Idempotent receive**: Completing the same artifact twice converges
//! - **Private payloads**: Senders commit to recipient data by hash only
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tessera_transfer::{TransferConfig, TransferEngine, TransferOptions, ReceiveOptions};
//! use tessera_ledger::InMemoryAggregator;
//! use tessera_core::Ed25519Provider;
//!
//! async fn example() {
//!     let aggregator = InMemoryAggregator::new();
//!     let config = TransferConfig::new(aggregator.trust_anchor());
//!     let engine = TransferEngine::new(aggregator, Ed25519Provider::new(), config);
//!
//!     // Sender prepares an artifact for the recipient.
//!     // let artifact = engine.prepare_offline(&snapshot, &alice, &bob_address, TransferOptions::default())?;
//!
//!     // Recipient completes it when online.
//!     // let received = engine.complete(&artifact, &bob, ReceiveOptions::default()).await?;
//! }
//! ```
//!
//! ## Transfer Flow
//!
//! ```text
//! Sender                    Recipient                 Ledger
//!   |--- prepare_offline       |                        |
//!   |    (sign commitment)     |                        |
//!   |--- artifact ------------>|                        |
//!   |                          |--- submit commitment ->|
//!   |                          |<-- inclusion proof ----|
//!   |                          |--- rotate state        |
//! ```

pub mod engine;
pub mod error;

pub use engine::{ReceiveOptions, TransferConfig, TransferEngine, TransferOptions};
pub use error::{Result, TransferError};
