//! Canonical CBOR encoding for hashing.
//!
//! State, transfer, and genesis records are hashed over a deterministic
//! CBOR encoding: maps use integer keys emitted in ascending order, and
//! ciborium writes definite lengths and minimal integers, which together
//! satisfy RFC 8949 Core Deterministic Encoding. The snapshot document
//! itself travels as JSON; these bytes exist only to be hashed, so there
//! is no decoder.
//!
//! Every hash is domain-prefixed so a state hash, a transfer hash, and a
//! genesis hash can never collide even over identical encodings.

use ciborium::value::Value;

use crate::crypto::Digest;
use crate::predicate::Predicate;
use crate::snapshot::GenesisData;
use crate::transaction::TransferData;
use crate::types::StateHash;

/// Field keys, kept in 0-23 so they encode as single bytes.
mod keys {
    pub mod predicate {
        pub const KIND: u8 = 0;
        pub const ALGORITHM: u8 = 1;
        pub const PUBLIC_KEY: u8 = 2;
        pub const NONCE: u8 = 3;
    }

    pub mod state {
        pub const DATA: u8 = 0;
        pub const PREDICATE: u8 = 1;
    }

    pub mod transfer {
        pub const SOURCE_STATE: u8 = 0;
        pub const RECIPIENT: u8 = 1;
        pub const MESSAGE: u8 = 2;
        pub const RECIPIENT_DATA_HASH: u8 = 3;
    }

    pub mod genesis {
        pub const TOKEN_ID: u8 = 0;
        pub const TOKEN_TYPE: u8 = 1;
        pub const SALT: u8 = 2;
        pub const INITIAL_DATA: u8 = 3;
        pub const COIN_DATA: u8 = 4;
    }
}

fn encode(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    ciborium::ser::into_writer(value, &mut buf).expect("CBOR encoding to a Vec cannot fail");
    buf
}

fn predicate_value(predicate: &Predicate) -> Value {
    let nonce = match &predicate.nonce {
        Some(nonce) => Value::Bytes(nonce.as_bytes().to_vec()),
        None => Value::Null,
    };
    Value::Map(vec![
        (
            Value::Integer(keys::predicate::KIND.into()),
            Value::Integer(predicate.kind.tag().into()),
        ),
        (
            Value::Integer(keys::predicate::ALGORITHM.into()),
            Value::Integer(predicate.algorithm.tag().into()),
        ),
        (
            Value::Integer(keys::predicate::PUBLIC_KEY.into()),
            Value::Bytes(predicate.public_key.as_bytes().to_vec()),
        ),
        (Value::Integer(keys::predicate::NONCE.into()), nonce),
    ])
}

/// Canonical bytes of a token state `(data, predicate)`.
pub fn canonical_state_bytes(data: Option<&[u8]>, predicate: &Predicate) -> Vec<u8> {
    let data_value = match data {
        Some(bytes) => Value::Bytes(bytes.to_vec()),
        None => Value::Null,
    };
    encode(&Value::Map(vec![
        (Value::Integer(keys::state::DATA.into()), data_value),
        (
            Value::Integer(keys::state::PREDICATE.into()),
            predicate_value(predicate),
        ),
    ]))
}

/// Canonical bytes of a transfer's binding data.
pub fn canonical_transfer_bytes(data: &TransferData) -> Vec<u8> {
    let message = match &data.message {
        Some(text) => Value::Text(text.clone()),
        None => Value::Null,
    };
    let recipient_data_hash = match &data.recipient_data_hash {
        Some(digest) => Value::Bytes(digest.as_bytes().to_vec()),
        None => Value::Null,
    };
    encode(&Value::Map(vec![
        (
            Value::Integer(keys::transfer::SOURCE_STATE.into()),
            Value::Bytes(data.source_state.as_bytes().to_vec()),
        ),
        (
            Value::Integer(keys::transfer::RECIPIENT.into()),
            Value::Bytes(data.recipient.as_bytes().to_vec()),
        ),
        (Value::Integer(keys::transfer::MESSAGE.into()), message),
        (
            Value::Integer(keys::transfer::RECIPIENT_DATA_HASH.into()),
            recipient_data_hash,
        ),
    ]))
}

/// Canonical bytes of a genesis record.
pub fn canonical_genesis_bytes(genesis: &GenesisData) -> Vec<u8> {
    let initial_data = match &genesis.initial_data {
        Some(bytes) => Value::Bytes(bytes.to_vec()),
        None => Value::Null,
    };
    // BTreeMap iteration is ascending over 32-byte keys, which matches
    // RFC 8949 ordering for equal-length byte-string keys.
    let coin_data = match &genesis.coin_data {
        Some(coins) => Value::Map(
            coins
                .iter()
                .map(|(coin_id, amount)| {
                    (
                        Value::Bytes(coin_id.as_bytes().to_vec()),
                        Value::Integer((*amount).into()),
                    )
                })
                .collect(),
        ),
        None => Value::Null,
    };
    encode(&Value::Map(vec![
        (
            Value::Integer(keys::genesis::TOKEN_ID.into()),
            Value::Bytes(genesis.token_id.as_bytes().to_vec()),
        ),
        (
            Value::Integer(keys::genesis::TOKEN_TYPE.into()),
            Value::Bytes(genesis.token_type.as_bytes().to_vec()),
        ),
        (
            Value::Integer(keys::genesis::SALT.into()),
            Value::Bytes(genesis.salt.as_bytes().to_vec()),
        ),
        (
            Value::Integer(keys::genesis::INITIAL_DATA.into()),
            initial_data,
        ),
        (Value::Integer(keys::genesis::COIN_DATA.into()), coin_data),
    ]))
}

/// Hash of a token state, domain-prefixed.
pub fn state_hash(data: Option<&[u8]>, predicate: &Predicate) -> StateHash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"tessera-state-v1:");
    hasher.update(&canonical_state_bytes(data, predicate));
    StateHash::from_bytes(*hasher.finalize().as_bytes())
}

/// Hash of a transfer's binding data, domain-prefixed.
pub fn transfer_hash(data: &TransferData) -> Digest {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"tessera-transfer-v1:");
    hasher.update(&canonical_transfer_bytes(data));
    Digest::from_bytes(*hasher.finalize().as_bytes())
}

/// Hash of a genesis record, domain-prefixed.
pub fn genesis_hash(genesis: &GenesisData) -> Digest {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"tessera-genesis-v1:");
    hasher.update(&canonical_genesis_bytes(genesis));
    Digest::from_bytes(*hasher.finalize().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;
    use crate::predicate::SignatureAlgorithm;
    use crate::types::{Address, CoinData, CoinId, Nonce, Salt, TokenId, TokenType};

    fn sample_predicate() -> Predicate {
        Predicate::unmasked(
            SignatureAlgorithm::Ed25519,
            Keypair::from_seed(&[1; 32]).public_key(),
        )
    }

    fn sample_genesis() -> GenesisData {
        let token_type = TokenType::from_name("asset");
        let salt = Salt::from_bytes([2; 32]);
        GenesisData {
            token_id: TokenId::derive(&token_type, &salt),
            token_type,
            salt,
            initial_data: Some(b"initial".to_vec().into()),
            coin_data: None,
        }
    }

    #[test]
    fn test_state_bytes_deterministic() {
        let predicate = sample_predicate();
        let b1 = canonical_state_bytes(Some(b"data"), &predicate);
        let b2 = canonical_state_bytes(Some(b"data"), &predicate);
        assert_eq!(b1, b2);

        // Two-entry map header.
        assert_eq!(b1[0], 0xa2);
    }

    #[test]
    fn test_state_hash_covers_data_and_predicate() {
        let predicate = sample_predicate();
        let base = state_hash(Some(b"data"), &predicate);

        assert_ne!(base, state_hash(Some(b"other"), &predicate));
        assert_ne!(base, state_hash(None, &predicate));

        let masked = Predicate::masked(
            SignatureAlgorithm::Ed25519,
            predicate.public_key,
            Nonce::from_bytes([3; 32]),
        );
        assert_ne!(base, state_hash(Some(b"data"), &masked));
    }

    #[test]
    fn test_transfer_bytes_cover_optional_fields() {
        let base = TransferData {
            source_state: StateHash::from_bytes([1; 32]),
            recipient: Address::from_bytes([2; 32]),
            message: None,
            recipient_data_hash: None,
        };

        let with_message = TransferData {
            message: Some("for lunch".into()),
            ..base.clone()
        };
        assert_ne!(canonical_transfer_bytes(&base), canonical_transfer_bytes(&with_message));

        let with_hash = TransferData {
            recipient_data_hash: Some(Digest::hash(b"payload")),
            ..base.clone()
        };
        assert_ne!(transfer_hash(&base), transfer_hash(&with_hash));
    }

    #[test]
    fn test_genesis_bytes_independent_of_coin_insertion_order() {
        let a = CoinId::from_bytes([1; 32]);
        let b = CoinId::from_bytes([2; 32]);

        let mut genesis_ab = sample_genesis();
        genesis_ab.coin_data = Some(CoinData::new().with_coin(a, 10).with_coin(b, 20));

        let mut genesis_ba = sample_genesis();
        genesis_ba.coin_data = Some(CoinData::new().with_coin(b, 20).with_coin(a, 10));

        assert_eq!(
            canonical_genesis_bytes(&genesis_ab),
            canonical_genesis_bytes(&genesis_ba)
        );
        assert_eq!(genesis_hash(&genesis_ab), genesis_hash(&genesis_ba));
    }

    #[test]
    fn test_genesis_hash_distinct_from_transfer_hash() {
        // Domain prefixes keep hash namespaces apart even if encodings
        // were ever to coincide.
        let genesis = sample_genesis();
        let transfer = TransferData {
            source_state: StateHash::from_bytes([1; 32]),
            recipient: Address::from_bytes([2; 32]),
            message: None,
            recipient_data_hash: None,
        };
        assert_ne!(genesis_hash(&genesis), transfer_hash(&transfer));
    }
}
