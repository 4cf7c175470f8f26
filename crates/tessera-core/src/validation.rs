//! Structural validation of token snapshots.
//!
//! [`validate_snapshot`] checks everything that can be checked without
//! the aggregator's certifying key: version, predicate shape, hash
//! consistency, and the cross-references between transfer data,
//! commitments, and proofs. [`validate_snapshot_with_anchor`] adds the
//! certificate checks on every embedded proof.

use crate::canonical;
use crate::error::ValidationError;
use crate::proof::TrustAnchor;
use crate::snapshot::{TokenSnapshot, SNAPSHOT_VERSION};
use crate::types::TokenId;

/// Validate a snapshot's internal consistency.
pub fn validate_snapshot(snapshot: &TokenSnapshot) -> Result<(), ValidationError> {
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(ValidationError::UnsupportedVersion(snapshot.version));
    }

    snapshot.state.predicate.validate()?;

    if snapshot.state.state_hash != snapshot.state.computed_hash() {
        return Err(ValidationError::StateHashMismatch);
    }

    let genesis = &snapshot.genesis;
    if genesis.data.token_id != TokenId::derive(&genesis.data.token_type, &genesis.data.salt) {
        return Err(ValidationError::TokenIdMismatch);
    }
    if genesis.inclusion_proof.transaction_hash != canonical::genesis_hash(&genesis.data) {
        return Err(ValidationError::GenesisHashMismatch);
    }

    for (index, tx) in snapshot.transactions.iter().enumerate() {
        tx.commitment.verify()?;
        if tx.commitment.transaction_hash != canonical::transfer_hash(&tx.data) {
            return Err(ValidationError::TransactionHashMismatch { index });
        }
        if tx.commitment.authenticator.state_hash != tx.data.source_state {
            return Err(ValidationError::SourceStateMismatch { index });
        }
        if tx.inclusion_proof.request_id != tx.commitment.request_id
            || tx.inclusion_proof.transaction_hash != tx.commitment.transaction_hash
        {
            return Err(ValidationError::ProofMismatch { index });
        }
    }

    if let Some(pending) = &snapshot.pending_transfer {
        pending.commitment.verify()?;
        if pending.commitment.transaction_hash != canonical::transfer_hash(&pending.data) {
            return Err(ValidationError::PendingHashMismatch);
        }
        if pending.data.source_state != snapshot.state.state_hash
            || pending.commitment.authenticator.state_hash != pending.data.source_state
        {
            return Err(ValidationError::PendingSourceMismatch);
        }
        if pending.sender != pending.commitment.authenticator.public_key {
            return Err(ValidationError::PendingSenderMismatch);
        }
        if pending.commitment.authenticator.public_key != snapshot.state.predicate.public_key {
            return Err(ValidationError::PendingOwnerMismatch);
        }
    }

    Ok(())
}

/// Validate structure, then verify every proof certificate against the
/// trust anchor.
pub fn validate_snapshot_with_anchor(
    snapshot: &TokenSnapshot,
    anchor: &TrustAnchor,
) -> Result<(), ValidationError> {
    validate_snapshot(snapshot)?;

    snapshot.genesis.inclusion_proof.verify(anchor)?;
    for tx in &snapshot.transactions {
        tx.inclusion_proof.verify(anchor)?;
    }

    Ok(())
}
