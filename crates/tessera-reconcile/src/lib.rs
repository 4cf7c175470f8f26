//! # Tessera Reconcile
//!
//! Ownership reconciliation for token snapshots.
//!
//! ## Overview
//!
//! A snapshot is a local claim about a token; the ledger holds the
//! ground truth about which states are spent. Reconciliation compares
//! the two and classifies the snapshot into one of four scenarios:
//! current, outdated, pending submission, or transfer confirmed.
//!
//! ## Key Properties
//!
//! - **Pure classification**: The decision table is a function, testable
//!   without a ledger
//! - **Graceful degradation**: Ledger faults become an unknown status,
//!   never an error
//! - **Untrusting**: Ledger answers count only when their certificates
//!   verify against the trust anchor
//!
//! ## Scenarios
//!
//! ```text
//! Ledger says          Snapshot claims            Scenario
//! -----------          ---------------            --------
//! unspent              nothing pending            Current
//! unspent              pending transfer           PendingSubmission
//! spent by hash H      pending or recorded H      TransferConfirmed
//! spent by hash H      no knowledge of H          Outdated
//! unknown              anything                   (deferred)
//! ```

pub mod engine;
pub mod error;
pub mod scenario;

pub use engine::{ReconcileConfig, ReconcileEngine, ReconcileReport};
pub use error::{ReconcileError, Result};
pub use scenario::{classify, LocalView, OwnershipScenario, SpendStatus};
