//! Scenario classification.
//!
//! Classification is a pure function of two inputs: what the ledger says
//! about the snapshot's current state, and what the snapshot claims
//! about itself. Keeping it pure makes the whole decision table
//! testable without a ledger.

use serde::{Deserialize, Serialize};

use tessera_core::{Digest, TokenSnapshot};

/// What the ledger says about a token's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendStatus {
    /// No spend is registered for the state's request id.
    Unspent,

    /// A spend is registered.
    Spent { transaction_hash: Digest },

    /// The ledger could not be consulted, or its answer did not verify.
    Unknown,
}

/// Where a snapshot stands relative to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipScenario {
    /// The snapshot is the live version of the token and spendable.
    Current,

    /// The state this snapshot considers current was spent by a
    /// transaction the snapshot knows nothing about. A newer version
    /// exists elsewhere.
    Outdated,

    /// A prepared transfer exists locally but the ledger has not seen
    /// its commitment yet.
    PendingSubmission,

    /// The transfer this snapshot initiated is registered in the ledger.
    TransferConfirmed,
}

/// The spend-relevant claims a snapshot makes about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalView {
    /// Transaction hash of the locally pending transfer, if any.
    pub pending: Option<Digest>,

    /// Transaction hash of a recorded transaction spending the current
    /// state, if any. Present on a sender's snapshot after an online
    /// send.
    pub spending_transaction: Option<Digest>,
}

impl LocalView {
    /// Extract the local view from a snapshot.
    pub fn of(snapshot: &TokenSnapshot) -> Self {
        let current = snapshot.state.state_hash;
        Self {
            pending: snapshot
                .pending_transfer
                .as_ref()
                .map(|p| p.commitment.transaction_hash),
            spending_transaction: snapshot
                .transactions
                .iter()
                .find(|tx| tx.data.source_state == current)
                .map(|tx| tx.commitment.transaction_hash),
        }
    }
}

/// Classify a snapshot's standing.
///
/// Returns `None` exactly when the ledger's answer is unknown. A
/// registered spend counts as the snapshot's own transfer when its hash
/// matches either the local pending commitment or a recorded spend of
/// the current state; any other registered spend means the snapshot is
/// outdated.
pub fn classify(status: &SpendStatus, local: &LocalView) -> Option<OwnershipScenario> {
    match status {
        SpendStatus::Unknown => None,
        SpendStatus::Unspent => Some(if local.pending.is_some() {
            OwnershipScenario::PendingSubmission
        } else {
            OwnershipScenario::Current
        }),
        SpendStatus::Spent { transaction_hash } => {
            let ours = local.spending_transaction == Some(*transaction_hash)
                || local.pending == Some(*transaction_hash);
            Some(if ours {
                OwnershipScenario::TransferConfirmed
            } else {
                OwnershipScenario::Outdated
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn view(pending: Option<u8>, spending: Option<u8>) -> LocalView {
        LocalView {
            pending: pending.map(|b| Digest::from_bytes([b; 32])),
            spending_transaction: spending.map(|b| Digest::from_bytes([b; 32])),
        }
    }

    #[test]
    fn test_unspent_without_pending_is_current() {
        assert_eq!(
            classify(&SpendStatus::Unspent, &view(None, None)),
            Some(OwnershipScenario::Current)
        );
    }

    #[test]
    fn test_unspent_with_pending_awaits_submission() {
        assert_eq!(
            classify(&SpendStatus::Unspent, &view(Some(1), None)),
            Some(OwnershipScenario::PendingSubmission)
        );
    }

    #[test]
    fn test_spent_matching_pending_is_confirmed() {
        let status = SpendStatus::Spent {
            transaction_hash: Digest::from_bytes([1; 32]),
        };
        assert_eq!(
            classify(&status, &view(Some(1), None)),
            Some(OwnershipScenario::TransferConfirmed)
        );
    }

    #[test]
    fn test_spent_matching_recorded_spend_is_confirmed() {
        let status = SpendStatus::Spent {
            transaction_hash: Digest::from_bytes([1; 32]),
        };
        assert_eq!(
            classify(&status, &view(None, Some(1))),
            Some(OwnershipScenario::TransferConfirmed)
        );
    }

    #[test]
    fn test_spent_by_someone_else_is_outdated() {
        let status = SpendStatus::Spent {
            transaction_hash: Digest::from_bytes([9; 32]),
        };
        assert_eq!(
            classify(&status, &view(None, None)),
            Some(OwnershipScenario::Outdated)
        );
        assert_eq!(
            classify(&status, &view(Some(1), Some(2))),
            Some(OwnershipScenario::Outdated)
        );
    }

    #[test]
    fn test_unknown_defers_classification() {
        assert_eq!(classify(&SpendStatus::Unknown, &view(Some(1), None)), None);
    }

    fn arb_digest() -> impl Strategy<Value = Digest> {
        prop::array::uniform32(any::<u8>()).prop_map(Digest::from_bytes)
    }

    fn arb_status() -> impl Strategy<Value = SpendStatus> {
        prop_oneof![
            Just(SpendStatus::Unspent),
            arb_digest().prop_map(|transaction_hash| SpendStatus::Spent { transaction_hash }),
            Just(SpendStatus::Unknown),
        ]
    }

    fn arb_view() -> impl Strategy<Value = LocalView> {
        (
            prop::option::of(arb_digest()),
            prop::option::of(arb_digest()),
        )
            .prop_map(|(pending, spending_transaction)| LocalView {
                pending,
                spending_transaction,
            })
    }

    proptest! {
        // Unknown is the only input that defers; everything else maps to
        // exactly one scenario.
        #[test]
        fn test_classify_total_outside_unknown(status in arb_status(), local in arb_view()) {
            let scenario = classify(&status, &local);
            match status {
                SpendStatus::Unknown => prop_assert!(scenario.is_none()),
                _ => prop_assert!(scenario.is_some()),
            }
        }

        #[test]
        fn test_matching_spend_is_never_outdated(hash in arb_digest(), other in prop::option::of(arb_digest())) {
            let status = SpendStatus::Spent { transaction_hash: hash };
            let local = LocalView { pending: Some(hash), spending_transaction: other };
            prop_assert_eq!(classify(&status, &local), Some(OwnershipScenario::TransferConfirmed));
        }
    }
}
