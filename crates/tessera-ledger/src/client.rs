//! The ledger client trait.
//!
//! The aggregator is reachable only through this interface: submit a
//! spend commitment, query the inclusion status of a request id. A
//! request id is registered at most once; the [`SubmitOutcome`] variants
//! encode the idempotent-resubmission and double-spend cases that
//! at-most-once semantics produce.

use std::sync::Arc;

use async_trait::async_trait;

use tessera_core::{Commitment, Digest, ExclusionProof, InclusionProof, RequestId};

use crate::error::Result;

/// Outcome of submitting a commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Registered for the first time.
    Accepted,

    /// Already registered with the same transaction hash. A success for
    /// idempotent resubmission.
    AlreadyExists,

    /// Already registered with a different transaction hash: the state
    /// was spent by someone else.
    Conflict {
        /// Transaction hash the ledger holds for this request id.
        existing: Digest,
    },
}

/// Response to an inclusion query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofResponse {
    /// The request id is registered; proof of the spend.
    Included(InclusionProof),

    /// The request id is absent; proof the state is unspent.
    Excluded(ExclusionProof),
}

/// Client interface to the commitment ledger.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Submit a spend commitment.
    ///
    /// Must be idempotent: resubmitting an already-registered commitment
    /// with the same content returns [`SubmitOutcome::AlreadyExists`],
    /// never an error.
    async fn submit_commitment(&self, commitment: &Commitment) -> Result<SubmitOutcome>;

    /// Query the spend status of a request id.
    async fn get_inclusion_proof(&self, request_id: &RequestId) -> Result<ProofResponse>;
}

#[async_trait]
impl<L: LedgerClient + ?Sized> LedgerClient for Arc<L> {
    async fn submit_commitment(&self, commitment: &Commitment) -> Result<SubmitOutcome> {
        (**self).submit_commitment(commitment).await
    }

    async fn get_inclusion_proof(&self, request_id: &RequestId) -> Result<ProofResponse> {
        (**self).get_inclusion_proof(request_id).await
    }
}

#[async_trait]
impl<L: LedgerClient + ?Sized> LedgerClient for &L {
    async fn submit_commitment(&self, commitment: &Commitment) -> Result<SubmitOutcome> {
        (**self).submit_commitment(commitment).await
    }

    async fn get_inclusion_proof(&self, request_id: &RequestId) -> Result<ProofResponse> {
        (**self).get_inclusion_proof(request_id).await
    }
}
