//! Proof polling.

use std::time::Duration;

use tessera_core::{InclusionProof, RequestId};

use crate::client::{LedgerClient, ProofResponse};
use crate::error::{LedgerError, Result};

/// Poll the ledger until the request id is included or the deadline
/// passes.
///
/// Exclusion responses and transient errors are retried on the poll
/// interval. Non-transient errors abort immediately; the deadline maps
/// to [`LedgerError::Timeout`].
pub async fn await_inclusion<L: LedgerClient + ?Sized>(
    ledger: &L,
    request_id: &RequestId,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<InclusionProof> {
    let poll = async {
        loop {
            match ledger.get_inclusion_proof(request_id).await {
                Ok(ProofResponse::Included(proof)) => return Ok(proof),
                Ok(ProofResponse::Excluded(_)) => {}
                Err(e) if e.is_transient() => {
                    tracing::debug!("Retrying inclusion query: {}", e);
                }
                Err(e) => return Err(e),
            }
            tokio::time::sleep(poll_interval).await;
        }
    };

    match tokio::time::timeout(timeout, poll).await {
        Ok(result) => result,
        Err(_) => Err(LedgerError::Timeout),
    }
}
