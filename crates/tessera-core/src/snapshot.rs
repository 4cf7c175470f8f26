//! The token snapshot: the self-contained document two parties exchange.
//!
//! A snapshot is an immutable value. Every mutator returns a new
//! snapshot, so concurrent holders of the same document can never
//! observe a half-applied transition.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, SnapshotError, ValidationError};
use crate::predicate::Predicate;
use crate::proof::{InclusionProof, TrustAnchor};
use crate::state::TokenState;
use crate::transaction::{PendingTransfer, TransferTransaction};
use crate::types::{CoinData, Salt, TokenId, TokenType};
use crate::validation;

/// The snapshot format version this crate reads and writes.
pub const SNAPSHOT_VERSION: u8 = 1;

/// The immutable creation record of a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisData {
    pub token_id: TokenId,
    pub token_type: TokenType,
    pub salt: Salt,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::serde_hex::opt_hex"
    )]
    pub initial_data: Option<Bytes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coin_data: Option<CoinData>,
}

/// Genesis data plus the proof anchoring the mint in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisRecord {
    pub data: GenesisData,
    pub inclusion_proof: InclusionProof,
}

/// The local lifecycle label of a snapshot.
///
/// Computed purely from local fields; whether the ledger agrees is the
/// reconciliation engine's question, not this one's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotStatus {
    /// No pending transfer and no completed transactions.
    Confirmed,
    /// A transfer has been prepared but not yet submitted.
    Pending,
    /// At least one transfer has completed.
    Transferred,
}

/// A serialized, self-contained token: genesis, current state, history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSnapshot {
    pub version: u8,
    pub genesis: GenesisRecord,
    pub state: TokenState,
    pub transactions: Vec<TransferTransaction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_transfer: Option<PendingTransfer>,
}

impl TokenSnapshot {
    /// A freshly minted snapshot: empty history, no pending transfer.
    pub fn minted(genesis: GenesisRecord, state: TokenState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            genesis,
            state,
            transactions: Vec::new(),
            pending_transfer: None,
        }
    }

    pub fn token_id(&self) -> TokenId {
        self.genesis.data.token_id
    }

    pub fn token_type(&self) -> TokenType {
        self.genesis.data.token_type
    }

    /// The current owner's spending condition.
    pub fn owner_predicate(&self) -> &Predicate {
        &self.state.predicate
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Determination order: a pending transfer wins, then any history,
    /// then confirmed.
    pub fn status(&self) -> SnapshotStatus {
        if self.pending_transfer.is_some() {
            SnapshotStatus::Pending
        } else if !self.transactions.is_empty() {
            SnapshotStatus::Transferred
        } else {
            SnapshotStatus::Confirmed
        }
    }

    /// Whether the local record permits spending the current state.
    ///
    /// A received snapshot has non-empty history (status Transferred)
    /// yet its rotated state is spendable; a sender's post-send snapshot
    /// keeps its old state, which a local transaction already spends.
    /// The distinction is exactly "does anything local spend
    /// `state.state_hash`".
    pub fn is_locally_spendable(&self) -> bool {
        self.pending_transfer.is_none()
            && !self
                .transactions
                .iter()
                .any(|tx| tx.data.source_state == self.state.state_hash)
    }

    /// Attach a prepared transfer. Status becomes Pending.
    pub fn with_pending_transfer(&self, pending: PendingTransfer) -> Self {
        let mut next = self.clone();
        next.pending_transfer = Some(pending);
        next
    }

    /// Drop a prepared transfer, reverting to the prior status.
    pub fn without_pending_transfer(&self) -> Self {
        let mut next = self.clone();
        next.pending_transfer = None;
        next
    }

    /// Append a completed transaction, leaving the state untouched.
    ///
    /// This is the sender's half of an immediate (online) transfer: the
    /// spent state stays in the document as evidence, and the appended
    /// transaction marks it spent.
    pub fn with_transaction(&self, transaction: TransferTransaction) -> Self {
        let mut next = self.clone();
        next.transactions.push(transaction);
        next
    }

    /// Complete a pending transfer: append it to the history with its
    /// proof and rotate the state to the new owner.
    ///
    /// Returns `None` when there is no pending transfer to complete.
    pub fn confirm_pending(&self, proof: InclusionProof, new_state: TokenState) -> Option<Self> {
        let pending = self.pending_transfer.as_ref()?;
        let mut next = self.clone();
        next.transactions.push(TransferTransaction {
            data: pending.data.clone(),
            commitment: pending.commitment.clone(),
            inclusion_proof: proof,
        });
        next.state = new_state;
        next.pending_transfer = None;
        Some(next)
    }

    /// Parse a snapshot document and validate it.
    pub fn from_json(document: &str) -> Result<Self, SnapshotError> {
        let snapshot = Self::from_json_unchecked(document)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Parse without validating. Callers own the consequences.
    pub fn from_json_unchecked(document: &str) -> Result<Self, ParseError> {
        Ok(serde_json::from_str(document)?)
    }

    pub fn to_json(&self) -> Result<String, ParseError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ParseError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Structural validation: version, predicate shape, hash
    /// consistency, commitment and proof cross-references.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_snapshot(self)
    }

    /// Structural validation plus certificate checks on every proof.
    pub fn validate_with_anchor(&self, anchor: &TrustAnchor) -> Result<(), ValidationError> {
        validation::validate_snapshot_with_anchor(self, anchor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Digest, Keypair, Signature};
    use crate::predicate::SignatureAlgorithm;
    use crate::transaction::{Authenticator, Commitment, TransferData};
    use crate::types::{Address, RequestId};

    fn sample_snapshot() -> TokenSnapshot {
        let token_type = TokenType::from_name("asset");
        let salt = Salt::from_bytes([2; 32]);
        let genesis_data = GenesisData {
            token_id: TokenId::derive(&token_type, &salt),
            token_type,
            salt,
            initial_data: None,
            coin_data: None,
        };
        let predicate = Predicate::unmasked(
            SignatureAlgorithm::Ed25519,
            Keypair::from_seed(&[1; 32]).public_key(),
        );
        let state = TokenState::new(Some(Bytes::from_static(b"data")), predicate);
        let genesis = GenesisRecord {
            data: genesis_data,
            inclusion_proof: InclusionProof {
                request_id: RequestId::from_bytes([3; 32]),
                transaction_hash: Digest::from_bytes([4; 32]),
                root: Digest::from_bytes([5; 32]),
                certificate: Signature::ZERO,
            },
        };
        TokenSnapshot::minted(genesis, state)
    }

    fn sample_pending(snapshot: &TokenSnapshot) -> PendingTransfer {
        let keypair = Keypair::from_seed(&[1; 32]);
        let data = TransferData {
            source_state: snapshot.state.state_hash,
            recipient: Address::from_bytes([6; 32]),
            message: None,
            recipient_data_hash: None,
        };
        let transaction_hash = crate::canonical::transfer_hash(&data);
        let commitment = Commitment {
            request_id: RequestId::derive(&keypair.public_key(), &data.source_state),
            transaction_hash,
            authenticator: Authenticator {
                public_key: keypair.public_key(),
                signature: keypair.sign(&Commitment::signing_message(&transaction_hash)),
                state_hash: data.source_state,
            },
        };
        PendingTransfer {
            sender: keypair.public_key(),
            data,
            commitment,
        }
    }

    #[test]
    fn test_minted_snapshot_is_confirmed_and_spendable() {
        let snapshot = sample_snapshot();
        assert_eq!(snapshot.status(), SnapshotStatus::Confirmed);
        assert_eq!(snapshot.transaction_count(), 0);
        assert!(snapshot.is_locally_spendable());
    }

    #[test]
    fn test_pending_status_and_removal() {
        let snapshot = sample_snapshot();
        let pending = sample_pending(&snapshot);

        let with_pending = snapshot.with_pending_transfer(pending);
        assert_eq!(with_pending.status(), SnapshotStatus::Pending);
        assert!(!with_pending.is_locally_spendable());

        // The original is untouched.
        assert_eq!(snapshot.status(), SnapshotStatus::Confirmed);

        let reverted = with_pending.without_pending_transfer();
        assert_eq!(reverted.status(), SnapshotStatus::Confirmed);
    }

    #[test]
    fn test_confirm_pending_rotates_state_and_appends() {
        let snapshot = sample_snapshot();
        let pending = sample_pending(&snapshot);
        let with_pending = snapshot.with_pending_transfer(pending);

        let new_predicate = Predicate::unmasked(
            SignatureAlgorithm::Ed25519,
            Keypair::from_seed(&[9; 32]).public_key(),
        );
        let new_state = TokenState::new(None, new_predicate);
        let proof = InclusionProof {
            request_id: RequestId::from_bytes([7; 32]),
            transaction_hash: Digest::from_bytes([8; 32]),
            root: Digest::from_bytes([9; 32]),
            certificate: Signature::ZERO,
        };

        let completed = with_pending
            .confirm_pending(proof, new_state.clone())
            .expect("pending transfer present");

        assert_eq!(completed.status(), SnapshotStatus::Transferred);
        assert_eq!(completed.transaction_count(), 1);
        assert_eq!(completed.state, new_state);
        assert!(completed.pending_transfer.is_none());
        // The rotated state is the receiver's to spend.
        assert!(completed.is_locally_spendable());
    }

    #[test]
    fn test_confirm_pending_without_pending_is_none() {
        let snapshot = sample_snapshot();
        let state = snapshot.state.clone();
        let proof = snapshot.genesis.inclusion_proof.clone();
        assert!(snapshot.confirm_pending(proof, state).is_none());
    }

    #[test]
    fn test_with_transaction_marks_state_spent() {
        let snapshot = sample_snapshot();
        let pending = sample_pending(&snapshot);

        let transaction = TransferTransaction {
            data: pending.data,
            commitment: pending.commitment,
            inclusion_proof: InclusionProof {
                request_id: RequestId::from_bytes([7; 32]),
                transaction_hash: Digest::from_bytes([8; 32]),
                root: Digest::from_bytes([9; 32]),
                certificate: Signature::ZERO,
            },
        };

        let sent = snapshot.with_transaction(transaction);
        assert_eq!(sent.status(), SnapshotStatus::Transferred);
        // The state was not rotated, and a local transaction spends it.
        assert!(!sent.is_locally_spendable());
    }

    #[test]
    fn test_json_roundtrip_preserves_document() {
        let snapshot = sample_snapshot();
        let pending = sample_pending(&snapshot);
        let with_pending = snapshot.with_pending_transfer(pending);

        let json = with_pending.to_json().unwrap();
        let back = TokenSnapshot::from_json_unchecked(&json).unwrap();
        assert_eq!(back, with_pending);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(TokenSnapshot::from_json_unchecked("not json").is_err());
        assert!(TokenSnapshot::from_json_unchecked("{\"version\": 1}").is_err());
    }
}
