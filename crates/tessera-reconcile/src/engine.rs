//! The reconciliation engine.

use std::time::Duration;

use serde::Serialize;

use tessera_core::{RequestId, SnapshotStatus, TokenSnapshot, TrustAnchor};
use tessera_ledger::{LedgerClient, ProofResponse};

use crate::error::Result;
use crate::scenario::{classify, LocalView, OwnershipScenario, SpendStatus};

/// Configuration for a reconcile engine.
#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    /// Aggregator key ledger answers must verify against.
    pub trust_anchor: TrustAnchor,
    /// Deadline for the spend-status query before degrading to unknown.
    pub query_timeout: Duration,
}

impl ReconcileConfig {
    pub fn new(trust_anchor: TrustAnchor) -> Self {
        Self {
            trust_anchor,
            query_timeout: Duration::from_secs(10),
        }
    }
}

/// What reconciliation established about one snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    /// Request id of the snapshot's current state.
    pub request_id: RequestId,
    /// The ledger's answer about that state.
    pub spend_status: SpendStatus,
    /// Classification, when the ledger answered.
    pub scenario: Option<OwnershipScenario>,
    /// The snapshot's own lifecycle label.
    pub local_status: SnapshotStatus,
    /// Completed transfers the snapshot records.
    pub transaction_count: usize,
}

/// Classifies snapshots against the ledger.
pub struct ReconcileEngine<L> {
    ledger: L,
    config: ReconcileConfig,
}

impl<L: LedgerClient> ReconcileEngine<L> {
    pub fn new(ledger: L, config: ReconcileConfig) -> Self {
        Self { ledger, config }
    }

    /// Reconcile one snapshot against the ledger.
    ///
    /// Validates the snapshot, asks the ledger about its current state,
    /// and classifies the answer. Ledger faults never fail the call;
    /// they surface as [`SpendStatus::Unknown`] with no scenario, and
    /// the local fields of the report stay meaningful.
    pub async fn reconcile(&self, snapshot: &TokenSnapshot) -> Result<ReconcileReport> {
        snapshot.validate()?;

        let owner = snapshot.owner_predicate().public_key;
        let request_id = RequestId::derive(&owner, &snapshot.state.state_hash);
        let spend_status = self.query_spend_status(&request_id).await;
        let scenario = classify(&spend_status, &LocalView::of(snapshot));

        Ok(ReconcileReport {
            request_id,
            spend_status,
            scenario,
            local_status: snapshot.status(),
            transaction_count: snapshot.transaction_count(),
        })
    }

    /// Query a request id, degrading every fault to unknown.
    ///
    /// A response only counts when it is for the queried id and its
    /// certificate verifies against the trust anchor.
    async fn query_spend_status(&self, request_id: &RequestId) -> SpendStatus {
        let query = self.ledger.get_inclusion_proof(request_id);
        let response = match tokio::time::timeout(self.config.query_timeout, query).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::warn!("Spend status query failed: {}", e);
                return SpendStatus::Unknown;
            }
            Err(_) => {
                tracing::warn!("Spend status query timed out");
                return SpendStatus::Unknown;
            }
        };

        match response {
            ProofResponse::Included(proof) => {
                if proof.request_id != *request_id
                    || proof.verify(&self.config.trust_anchor).is_err()
                {
                    tracing::warn!("Discarding unverifiable inclusion answer for {:?}", request_id);
                    return SpendStatus::Unknown;
                }
                SpendStatus::Spent {
                    transaction_hash: proof.transaction_hash,
                }
            }
            ProofResponse::Excluded(proof) => {
                if proof.request_id != *request_id
                    || proof.verify(&self.config.trust_anchor).is_err()
                {
                    tracing::warn!("Discarding unverifiable exclusion answer for {:?}", request_id);
                    return SpendStatus::Unknown;
                }
                SpendStatus::Unspent
            }
        }
    }
}
