//! Transfer transactions and spend commitments.

use serde::{Deserialize, Serialize};

use crate::crypto::{Digest, PublicKey, Signature};
use crate::error::ValidationError;
use crate::proof::InclusionProof;
use crate::types::{Address, RequestId, StateHash};

/// What a transfer binds: the state being spent, the destination, and
/// the optional message and recipient-data commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferData {
    /// Hash of the state this transfer spends.
    pub source_state: StateHash,
    pub recipient: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Hash of the state data the recipient will adopt, committed by the
    /// sender without ever seeing the preimage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_data_hash: Option<Digest>,
}

/// The owner's signature over a transaction hash, with the key and state
/// hash needed to re-derive the request id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authenticator {
    pub public_key: PublicKey,
    pub signature: Signature,
    pub state_hash: StateHash,
}

/// A spend commitment as submitted to the ledger.
///
/// The ledger registers a request id at most once; two commitments with
/// the same request id but different transaction hashes are a double
/// spend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    pub request_id: RequestId,
    pub transaction_hash: Digest,
    pub authenticator: Authenticator,
}

impl Commitment {
    /// The message the owner signs for a given transaction hash.
    pub fn signing_message(transaction_hash: &Digest) -> Vec<u8> {
        let mut message = Vec::with_capacity(18 + 32);
        message.extend_from_slice(b"tessera-commit-v1:");
        message.extend_from_slice(transaction_hash.as_bytes());
        message
    }

    /// Check internal consistency: the request id must be derivable from
    /// the authenticator, and the signature must cover the transaction
    /// hash.
    pub fn verify(&self) -> Result<(), ValidationError> {
        let derived = RequestId::derive(
            &self.authenticator.public_key,
            &self.authenticator.state_hash,
        );
        if derived != self.request_id {
            return Err(ValidationError::RequestIdMismatch);
        }

        let message = Self::signing_message(&self.transaction_hash);
        self.authenticator
            .public_key
            .verify(&message, &self.authenticator.signature)
            .map_err(|_| ValidationError::SignatureFailed)
    }
}

/// A prepared transfer that has not yet been submitted to the ledger.
///
/// This is the payload of an offline transfer artifact: the receiver
/// submits the embedded commitment themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransfer {
    /// Public key of the owner who prepared the transfer.
    pub sender: PublicKey,
    pub data: TransferData,
    pub commitment: Commitment,
}

/// A completed transfer: data, commitment, and the inclusion proof
/// anchoring it in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferTransaction {
    pub data: TransferData,
    pub commitment: Commitment,
    pub inclusion_proof: InclusionProof,
}
