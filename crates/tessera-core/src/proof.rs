//! Inclusion and exclusion proofs.
//!
//! The aggregator answers every query with a certificate signed by its
//! certifying key: an inclusion proof when the request id is registered,
//! an exclusion proof when it is not. Sparse-Merkle path verification is
//! the aggregator SDK's concern; the trust boundary enforced here is the
//! certificate signature against a [`TrustAnchor`].

use serde::{Deserialize, Serialize};

use crate::crypto::{Digest, PublicKey, Signature};
use crate::error::ValidationError;
use crate::types::RequestId;

/// The aggregator's certifying public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustAnchor {
    pub public_key: PublicKey,
}

impl TrustAnchor {
    pub fn new(public_key: PublicKey) -> Self {
        Self { public_key }
    }
}

/// Proof that a request id is registered in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionProof {
    pub request_id: RequestId,
    /// Hash of the transaction the ledger registered under the request id.
    pub transaction_hash: Digest,
    /// Ledger root at certification time.
    pub root: Digest,
    pub certificate: Signature,
}

impl InclusionProof {
    /// The message the aggregator certifies for an inclusion.
    pub fn signing_message(
        request_id: &RequestId,
        transaction_hash: &Digest,
        root: &Digest,
    ) -> Vec<u8> {
        let mut message = Vec::with_capacity(21 + 96);
        message.extend_from_slice(b"tessera-inclusion-v1:");
        message.extend_from_slice(request_id.as_bytes());
        message.extend_from_slice(transaction_hash.as_bytes());
        message.extend_from_slice(root.as_bytes());
        message
    }

    /// Verify the certificate against the trust anchor.
    pub fn verify(&self, anchor: &TrustAnchor) -> Result<(), ValidationError> {
        let message = Self::signing_message(&self.request_id, &self.transaction_hash, &self.root);
        anchor
            .public_key
            .verify(&message, &self.certificate)
            .map_err(|_| ValidationError::CertificateInvalid)
    }
}

/// Proof that a request id is absent from the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionProof {
    pub request_id: RequestId,
    /// Ledger root at certification time.
    pub root: Digest,
    pub certificate: Signature,
}

impl ExclusionProof {
    /// The message the aggregator certifies for an exclusion.
    pub fn signing_message(request_id: &RequestId, root: &Digest) -> Vec<u8> {
        let mut message = Vec::with_capacity(21 + 64);
        message.extend_from_slice(b"tessera-exclusion-v1:");
        message.extend_from_slice(request_id.as_bytes());
        message.extend_from_slice(root.as_bytes());
        message
    }

    /// Verify the certificate against the trust anchor.
    pub fn verify(&self, anchor: &TrustAnchor) -> Result<(), ValidationError> {
        let message = Self::signing_message(&self.request_id, &self.root);
        anchor
            .public_key
            .verify(&message, &self.certificate)
            .map_err(|_| ValidationError::CertificateInvalid)
    }
}
