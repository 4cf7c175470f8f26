//! # Tessera Testkit
//!
//! Testing utilities for the Tessera crates.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a wallet wired to an in-memory aggregator for end-to-end scenarios
//! - **Generators**: proptest strategies over the protocol types
//! - **Fault injection**: ledger clients that fail on purpose
//!
//! ## Test Fixtures
//!
//! Quickly set up a working mint-and-transfer environment:
//!
//! ```rust,no_run
//! use tessera_testkit::{owner, TestFixture};
//!
//! async fn mint_and_pass_along() {
//!     tessera_testkit::init_tracing();
//!
//!     let fixture = TestFixture::new();
//!     let minted = fixture.mint("concert-ticket", &owner(1)).await;
//!     let received = fixture.handoff(&minted, &owner(1), &owner(2)).await;
//!     assert!(received.is_locally_spendable());
//! }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use tessera_testkit::{state_from_params, StateParams};
//!
//! proptest! {
//!     #[test]
//!     fn state_hash_is_deterministic(params: StateParams) {
//!         let a = state_from_params(&params);
//!         let b = state_from_params(&params);
//!         prop_assert_eq!(a.state_hash, b.state_hash);
//!     }
//! }
//! ```
//!
//! ## Fault Injection
//!
//! Point an engine at a ledger that misbehaves:
//!
//! ```rust,no_run
//! use tessera::reconcile::{ReconcileConfig, ReconcileEngine};
//! use tessera_testkit::{TestFixture, UnreachableLedger};
//!
//! async fn reconcile_against_a_dead_ledger() {
//!     let fixture = TestFixture::new();
//!     let _engine = ReconcileEngine::new(
//!         UnreachableLedger,
//!         ReconcileConfig::new(fixture.trust_anchor()),
//!     );
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod ledgers;

pub use fixtures::{init_tracing, masked_owner, owner, FixtureWallet, TestFixture};
pub use generators::{state_from_params, StateParams};
pub use ledgers::{FlakyLedger, UnreachableLedger};
