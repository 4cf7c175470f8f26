//! Fault-injecting ledger clients for failure-path tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tessera_core::{Commitment, RequestId};
use tessera_ledger::{LedgerClient, LedgerError, ProofResponse, Result, SubmitOutcome};

/// A ledger that refuses every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnreachableLedger;

#[async_trait]
impl LedgerClient for UnreachableLedger {
    async fn submit_commitment(&self, _commitment: &Commitment) -> Result<SubmitOutcome> {
        Err(LedgerError::Unreachable("connection refused".to_string()))
    }

    async fn get_inclusion_proof(&self, _request_id: &RequestId) -> Result<ProofResponse> {
        Err(LedgerError::Unreachable("connection refused".to_string()))
    }
}

/// Delegates to an inner ledger after failing the first `failures`
/// inclusion queries.
///
/// Submissions always pass through, so a submitted commitment is never
/// lost; only the answer is delayed. This exercises the polling paths
/// that have to ride out transient faults.
#[derive(Debug)]
pub struct FlakyLedger<L> {
    inner: L,
    remaining: AtomicUsize,
}

impl<L> FlakyLedger<L> {
    /// Wrap `inner`, failing its first `failures` inclusion queries.
    pub fn new(inner: L, failures: usize) -> Self {
        Self {
            inner,
            remaining: AtomicUsize::new(failures),
        }
    }

    fn take_failure(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl<L: LedgerClient> LedgerClient for FlakyLedger<L> {
    async fn submit_commitment(&self, commitment: &Commitment) -> Result<SubmitOutcome> {
        self.inner.submit_commitment(commitment).await
    }

    async fn get_inclusion_proof(&self, request_id: &RequestId) -> Result<ProofResponse> {
        if self.take_failure() {
            return Err(LedgerError::Unreachable("connection reset".to_string()));
        }
        self.inner.get_inclusion_proof(request_id).await
    }
}
