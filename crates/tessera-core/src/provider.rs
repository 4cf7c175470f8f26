//! The injected cryptography seam.
//!
//! Protocol engines never touch key material directly; they go through a
//! [`CryptoProvider`], which makes the signing scheme swappable and lets
//! tests substitute deterministic providers.

use crate::crypto::{Digest, Keypair, SecretSeed, Signature};
use crate::predicate::{Predicate, SignatureAlgorithm};
use crate::types::{Nonce, TokenId, TokenType};

/// An owner's secret material: the seed, plus a nonce when the owner
/// holds the token behind a masked (one-time) predicate.
#[derive(Debug, Clone, Copy)]
pub struct OwnerCredentials {
    pub secret: SecretSeed,
    pub nonce: Option<Nonce>,
}

impl OwnerCredentials {
    /// Credentials for a reusable (unmasked) predicate.
    pub fn unmasked(secret: SecretSeed) -> Self {
        Self {
            secret,
            nonce: None,
        }
    }

    /// Credentials for a one-time (masked) predicate.
    pub fn masked(secret: SecretSeed, nonce: Nonce) -> Self {
        Self {
            secret,
            nonce: Some(nonce),
        }
    }
}

/// Signing, address derivation, and hashing, behind a trait.
pub trait CryptoProvider: Send + Sync {
    /// Hash arbitrary bytes.
    fn digest(&self, data: &[u8]) -> Digest;

    /// Derive the predicate the given credentials control for a token.
    ///
    /// Deterministic: the same credentials and token always produce the
    /// same predicate, which is what lets a receiver re-derive the
    /// address a transfer was sent to.
    fn derive_predicate(
        &self,
        credentials: &OwnerCredentials,
        token_id: &TokenId,
        token_type: &TokenType,
    ) -> Predicate;

    /// Sign a message with the key behind the derived predicate.
    fn sign(
        &self,
        credentials: &OwnerCredentials,
        token_id: &TokenId,
        token_type: &TokenType,
        message: &[u8],
    ) -> Signature;
}

/// The shipped provider: Blake3 digests and Ed25519 signatures.
///
/// Masked credentials sign with a one-time subkey derived from the
/// secret, nonce, and token identity, so the long-term key never appears
/// in a masked predicate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Provider;

impl Ed25519Provider {
    pub fn new() -> Self {
        Self
    }

    fn keypair_for(
        &self,
        credentials: &OwnerCredentials,
        token_id: &TokenId,
        token_type: &TokenType,
    ) -> Keypair {
        match &credentials.nonce {
            None => Keypair::from_seed(credentials.secret.as_bytes()),
            Some(nonce) => {
                let mut hasher = blake3::Hasher::new();
                hasher.update(b"tessera-masked-key-v1:");
                hasher.update(credentials.secret.as_bytes());
                hasher.update(nonce.as_bytes());
                hasher.update(token_id.as_bytes());
                hasher.update(token_type.as_bytes());
                Keypair::from_seed(hasher.finalize().as_bytes())
            }
        }
    }
}

impl CryptoProvider for Ed25519Provider {
    fn digest(&self, data: &[u8]) -> Digest {
        Digest::hash(data)
    }

    fn derive_predicate(
        &self,
        credentials: &OwnerCredentials,
        token_id: &TokenId,
        token_type: &TokenType,
    ) -> Predicate {
        let public_key = self.keypair_for(credentials, token_id, token_type).public_key();
        match credentials.nonce {
            None => Predicate::unmasked(SignatureAlgorithm::Ed25519, public_key),
            Some(nonce) => Predicate::masked(SignatureAlgorithm::Ed25519, public_key, nonce),
        }
    }

    fn sign(
        &self,
        credentials: &OwnerCredentials,
        token_id: &TokenId,
        token_type: &TokenType,
        message: &[u8],
    ) -> Signature {
        self.keypair_for(credentials, token_id, token_type).sign(message)
    }
}
