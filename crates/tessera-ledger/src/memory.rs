//! In-memory aggregator.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use tessera_core::{
    Commitment, Digest, ExclusionProof, InclusionProof, Keypair, RequestId, TrustAnchor,
};

use crate::client::{LedgerClient, ProofResponse, SubmitOutcome};
use crate::error::{LedgerError, Result};

/// A single-node aggregator held entirely in memory.
///
/// Registers commitments with at-most-once semantics per request id and
/// certifies inclusion and exclusion with its own Ed25519 key. Suited to
/// tests and local development; production wallets reach a real
/// aggregator through their own [`LedgerClient`] implementation.
pub struct InMemoryAggregator {
    inner: RwLock<AggregatorInner>,
    keypair: Keypair,
}

struct AggregatorInner {
    entries: HashMap<RequestId, Digest>,
    root: Digest,
}

impl InMemoryAggregator {
    /// Create an aggregator with a fresh random certifying key.
    pub fn new() -> Self {
        Self::from_keypair(Keypair::generate())
    }

    /// Create an aggregator with a certifying key derived from a seed.
    pub fn with_seed(seed: &[u8; 32]) -> Self {
        Self::from_keypair(Keypair::from_seed(seed))
    }

    fn from_keypair(keypair: Keypair) -> Self {
        Self {
            inner: RwLock::new(AggregatorInner {
                entries: HashMap::new(),
                root: Digest::ZERO,
            }),
            keypair,
        }
    }

    /// The anchor clients verify this aggregator's certificates against.
    pub fn trust_anchor(&self) -> TrustAnchor {
        TrustAnchor::new(self.keypair.public_key())
    }

    /// Number of registered request ids.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current ledger root.
    pub fn root(&self) -> Digest {
        self.inner.read().unwrap().root
    }

    fn advance_root(
        previous: &Digest,
        request_id: &RequestId,
        transaction_hash: &Digest,
    ) -> Digest {
        let mut preimage = Vec::with_capacity(16 + 96);
        preimage.extend_from_slice(b"tessera-root-v1:");
        preimage.extend_from_slice(previous.as_bytes());
        preimage.extend_from_slice(request_id.as_bytes());
        preimage.extend_from_slice(transaction_hash.as_bytes());
        Digest::hash(&preimage)
    }
}

impl Default for InMemoryAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerClient for InMemoryAggregator {
    async fn submit_commitment(&self, commitment: &Commitment) -> Result<SubmitOutcome> {
        commitment
            .verify()
            .map_err(|e| LedgerError::Rejected(e.to_string()))?;

        let mut inner = self.inner.write().unwrap();
        if let Some(existing) = inner.entries.get(&commitment.request_id).copied() {
            if existing == commitment.transaction_hash {
                tracing::debug!("Duplicate commitment for {:?}", commitment.request_id);
                return Ok(SubmitOutcome::AlreadyExists);
            }
            tracing::warn!(
                "Conflicting commitment for {:?}: registered {}, received {}",
                commitment.request_id,
                existing,
                commitment.transaction_hash
            );
            return Ok(SubmitOutcome::Conflict { existing });
        }

        inner.root = Self::advance_root(
            &inner.root,
            &commitment.request_id,
            &commitment.transaction_hash,
        );
        inner
            .entries
            .insert(commitment.request_id, commitment.transaction_hash);
        Ok(SubmitOutcome::Accepted)
    }

    async fn get_inclusion_proof(&self, request_id: &RequestId) -> Result<ProofResponse> {
        let inner = self.inner.read().unwrap();
        match inner.entries.get(request_id).copied() {
            Some(transaction_hash) => {
                let message =
                    InclusionProof::signing_message(request_id, &transaction_hash, &inner.root);
                Ok(ProofResponse::Included(InclusionProof {
                    request_id: *request_id,
                    transaction_hash,
                    root: inner.root,
                    certificate: self.keypair.sign(&message),
                }))
            }
            None => {
                let message = ExclusionProof::signing_message(request_id, &inner.root);
                Ok(ProofResponse::Excluded(ExclusionProof {
                    request_id: *request_id,
                    root: inner.root,
                    certificate: self.keypair.sign(&message),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::{Authenticator, Signature, StateHash};

    fn signed_commitment(keypair: &Keypair, state: [u8; 32], tx: [u8; 32]) -> Commitment {
        let state_hash = StateHash::from_bytes(state);
        let transaction_hash = Digest::from_bytes(tx);
        let signature = keypair.sign(&Commitment::signing_message(&transaction_hash));
        Commitment {
            request_id: RequestId::derive(&keypair.public_key(), &state_hash),
            transaction_hash,
            authenticator: Authenticator {
                public_key: keypair.public_key(),
                signature,
                state_hash,
            },
        }
    }

    #[tokio::test]
    async fn test_submit_then_resubmit_is_idempotent() {
        let aggregator = InMemoryAggregator::with_seed(&[1; 32]);
        let owner = Keypair::from_seed(&[2; 32]);
        let commitment = signed_commitment(&owner, [3; 32], [4; 32]);

        let first = aggregator
            .submit_commitment(&commitment)
            .await
            .expect("submit");
        assert_eq!(first, SubmitOutcome::Accepted);

        let second = aggregator
            .submit_commitment(&commitment)
            .await
            .expect("resubmit");
        assert_eq!(second, SubmitOutcome::AlreadyExists);
        assert_eq!(aggregator.len(), 1);
    }

    #[tokio::test]
    async fn test_conflicting_commitment_reports_existing_hash() {
        let aggregator = InMemoryAggregator::with_seed(&[1; 32]);
        let owner = Keypair::from_seed(&[2; 32]);

        let original = signed_commitment(&owner, [3; 32], [4; 32]);
        aggregator
            .submit_commitment(&original)
            .await
            .expect("submit");

        let competing = signed_commitment(&owner, [3; 32], [5; 32]);
        let outcome = aggregator
            .submit_commitment(&competing)
            .await
            .expect("submit");
        assert_eq!(
            outcome,
            SubmitOutcome::Conflict {
                existing: Digest::from_bytes([4; 32]),
            }
        );
        assert_eq!(aggregator.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_commitment_rejected() {
        let aggregator = InMemoryAggregator::with_seed(&[1; 32]);
        let owner = Keypair::from_seed(&[2; 32]);

        let mut commitment = signed_commitment(&owner, [3; 32], [4; 32]);
        commitment.authenticator.signature = Signature::ZERO;

        let err = aggregator
            .submit_commitment(&commitment)
            .await
            .expect_err("forged signature must be rejected");
        assert!(matches!(err, LedgerError::Rejected(_)));
        assert!(aggregator.is_empty());
    }

    #[tokio::test]
    async fn test_inclusion_proof_verifies_against_trust_anchor() {
        let aggregator = InMemoryAggregator::with_seed(&[1; 32]);
        let owner = Keypair::from_seed(&[2; 32]);
        let commitment = signed_commitment(&owner, [3; 32], [4; 32]);
        aggregator
            .submit_commitment(&commitment)
            .await
            .expect("submit");

        let response = aggregator
            .get_inclusion_proof(&commitment.request_id)
            .await
            .expect("query");
        let proof = match response {
            ProofResponse::Included(proof) => proof,
            ProofResponse::Excluded(_) => panic!("registered id must be included"),
        };

        assert_eq!(proof.request_id, commitment.request_id);
        assert_eq!(proof.transaction_hash, commitment.transaction_hash);
        proof
            .verify(&aggregator.trust_anchor())
            .expect("certificate must verify");
    }

    #[tokio::test]
    async fn test_unregistered_id_gets_exclusion_proof() {
        let aggregator = InMemoryAggregator::with_seed(&[1; 32]);
        let request_id = RequestId::from_bytes([9; 32]);

        let response = aggregator
            .get_inclusion_proof(&request_id)
            .await
            .expect("query");
        let proof = match response {
            ProofResponse::Excluded(proof) => proof,
            ProofResponse::Included(_) => panic!("unregistered id must be excluded"),
        };

        assert_eq!(proof.request_id, request_id);
        proof
            .verify(&aggregator.trust_anchor())
            .expect("certificate must verify");
    }

    #[tokio::test]
    async fn test_root_advances_on_each_registration() {
        let aggregator = InMemoryAggregator::with_seed(&[1; 32]);
        let owner = Keypair::from_seed(&[2; 32]);
        assert_eq!(aggregator.root(), Digest::ZERO);

        aggregator
            .submit_commitment(&signed_commitment(&owner, [3; 32], [4; 32]))
            .await
            .expect("submit");
        let after_first = aggregator.root();
        assert_ne!(after_first, Digest::ZERO);

        aggregator
            .submit_commitment(&signed_commitment(&owner, [5; 32], [6; 32]))
            .await
            .expect("submit");
        assert_ne!(aggregator.root(), after_first);
    }
}
