//! Predicates: the spending condition attached to a token state.
//!
//! A predicate carries the owner's public key, the signature algorithm,
//! and the address-derivation mode. Unmasked predicates derive a reusable
//! address from the key alone; masked predicates fold a nonce and the
//! token identity into the derivation, producing a one-time address that
//! cannot be linked to the owner's long-term key.

use serde::{Deserialize, Serialize};

use crate::crypto::PublicKey;
use crate::error::ValidationError;
use crate::types::{Address, Nonce, TokenId, TokenType};

/// Whether an address derivation is one-time or reusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateKind {
    /// Reusable address derived from the public key alone.
    Unmasked,
    /// One-time address bound to a nonce and a specific token.
    Masked,
}

impl PredicateKind {
    /// Stable tag for canonical encoding.
    pub fn tag(&self) -> u8 {
        match self {
            PredicateKind::Unmasked => 0,
            PredicateKind::Masked => 1,
        }
    }
}

/// The signature algorithm a predicate commits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureAlgorithm {
    Ed25519,
}

impl SignatureAlgorithm {
    /// Stable tag for canonical encoding and address derivation.
    pub fn tag(&self) -> u8 {
        match self {
            SignatureAlgorithm::Ed25519 => 0,
        }
    }
}

/// The spending condition of a token state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub kind: PredicateKind,
    pub algorithm: SignatureAlgorithm,
    pub public_key: PublicKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<Nonce>,
}

impl Predicate {
    /// Build a reusable predicate.
    pub fn unmasked(algorithm: SignatureAlgorithm, public_key: PublicKey) -> Self {
        Self {
            kind: PredicateKind::Unmasked,
            algorithm,
            public_key,
            nonce: None,
        }
    }

    /// Build a one-time predicate bound to a nonce.
    pub fn masked(algorithm: SignatureAlgorithm, public_key: PublicKey, nonce: Nonce) -> Self {
        Self {
            kind: PredicateKind::Masked,
            algorithm,
            public_key,
            nonce: Some(nonce),
        }
    }

    pub fn is_masked(&self) -> bool {
        self.kind == PredicateKind::Masked
    }

    /// Check the kind/nonce pairing.
    ///
    /// Constructors uphold this by type; deserialized predicates may not.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match (self.kind, self.nonce.is_some()) {
            (PredicateKind::Masked, false) => Err(ValidationError::MalformedPredicate(
                "masked predicate missing nonce".into(),
            )),
            (PredicateKind::Unmasked, true) => Err(ValidationError::MalformedPredicate(
                "unmasked predicate carries a nonce".into(),
            )),
            _ => Ok(()),
        }
    }

    /// Derive the address this predicate answers to.
    ///
    /// Unmasked addresses ignore the token identity and are reusable
    /// across tokens; masked addresses are bound to one token and nonce.
    pub fn address(
        &self,
        token_id: &TokenId,
        token_type: &TokenType,
    ) -> Result<Address, ValidationError> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"tessera-address-v1:");
        hasher.update(&[self.kind.tag(), self.algorithm.tag()]);
        hasher.update(self.public_key.as_bytes());
        if self.is_masked() {
            let nonce = self.nonce.as_ref().ok_or_else(|| {
                ValidationError::MalformedPredicate("masked predicate missing nonce".into())
            })?;
            hasher.update(token_id.as_bytes());
            hasher.update(token_type.as_bytes());
            hasher.update(nonce.as_bytes());
        }
        Ok(Address(*hasher.finalize().as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;
    use crate::types::Salt;

    fn token() -> (TokenId, TokenType) {
        let token_type = TokenType::from_name("asset");
        let token_id = TokenId::derive(&token_type, &Salt::from_bytes([1; 32]));
        (token_id, token_type)
    }

    #[test]
    fn test_unmasked_address_reusable_across_tokens() {
        let pk = Keypair::generate().public_key();
        let predicate = Predicate::unmasked(SignatureAlgorithm::Ed25519, pk);

        let (id_a, type_a) = token();
        let type_b = TokenType::from_name("other");
        let id_b = TokenId::derive(&type_b, &Salt::from_bytes([2; 32]));

        let addr_a = predicate.address(&id_a, &type_a).unwrap();
        let addr_b = predicate.address(&id_b, &type_b).unwrap();
        assert_eq!(addr_a, addr_b);
    }

    #[test]
    fn test_masked_address_bound_to_token_and_nonce() {
        let pk = Keypair::generate().public_key();
        let (token_id, token_type) = token();

        let predicate = Predicate::masked(SignatureAlgorithm::Ed25519, pk, Nonce::from_bytes([9; 32]));
        let addr = predicate.address(&token_id, &token_type).unwrap();

        let other_nonce = Predicate::masked(SignatureAlgorithm::Ed25519, pk, Nonce::from_bytes([10; 32]));
        assert_ne!(addr, other_nonce.address(&token_id, &token_type).unwrap());

        let other_id = TokenId::derive(&token_type, &Salt::from_bytes([3; 32]));
        assert_ne!(addr, predicate.address(&other_id, &token_type).unwrap());
    }

    #[test]
    fn test_masked_and_unmasked_addresses_differ() {
        let pk = Keypair::generate().public_key();
        let (token_id, token_type) = token();

        let unmasked = Predicate::unmasked(SignatureAlgorithm::Ed25519, pk);
        let masked = Predicate::masked(SignatureAlgorithm::Ed25519, pk, Nonce::from_bytes([0; 32]));

        assert_ne!(
            unmasked.address(&token_id, &token_type).unwrap(),
            masked.address(&token_id, &token_type).unwrap()
        );
    }

    #[test]
    fn test_validate_rejects_kind_nonce_mismatch() {
        let pk = Keypair::generate().public_key();

        let mut predicate = Predicate::masked(SignatureAlgorithm::Ed25519, pk, Nonce::from_bytes([1; 32]));
        predicate.nonce = None;
        assert!(predicate.validate().is_err());

        let mut predicate = Predicate::unmasked(SignatureAlgorithm::Ed25519, pk);
        predicate.nonce = Some(Nonce::from_bytes([1; 32]));
        assert!(predicate.validate().is_err());
    }

    #[test]
    fn test_predicate_json_omits_absent_nonce() {
        let pk = Keypair::from_seed(&[3; 32]).public_key();
        let predicate = Predicate::unmasked(SignatureAlgorithm::Ed25519, pk);

        let json = serde_json::to_string(&predicate).unwrap();
        assert!(!json.contains("nonce"));

        let back: Predicate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, predicate);
    }
}
