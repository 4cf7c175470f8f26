//! Serde helpers for hex-encoded binary fields.
//!
//! Snapshot documents are JSON; every fixed-width binary field is carried
//! as a lowercase hex string. serde cannot derive `[u8; 64]`, so the
//! signature newtype (and, for uniformity, every other byte-array newtype)
//! routes through [`hex_array`].

use serde::{Deserialize, Deserializer, Serializer};

/// `#[serde(with = "...")]` module for `[u8; N]` fields.
pub mod hex_array {
    use super::*;

    pub fn serialize<S, const N: usize>(bytes: &[u8; N], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D, const N: usize>(deserializer: D) -> Result<[u8; N], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        bytes.as_slice().try_into().map_err(|_| {
            serde::de::Error::custom(format!("expected {} hex bytes, got {}", N, bytes.len()))
        })
    }
}

/// `#[serde(with = "...")]` module for `Option<Bytes>` fields.
pub mod opt_hex {
    use super::*;
    use bytes::Bytes;

    pub fn serialize<S>(value: &Option<Bytes>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(bytes) => serializer.serialize_some(&hex::encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Bytes>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => {
                let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
                Ok(Some(Bytes::from(bytes)))
            }
            None => Ok(None),
        }
    }
}
