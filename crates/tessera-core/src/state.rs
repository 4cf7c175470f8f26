//! Token state: the current `(data, predicate)` pair and its hash.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::canonical;
use crate::predicate::Predicate;
use crate::types::StateHash;

/// The terminal state of a token: who owns it and what data it carries.
///
/// The stored `state_hash` must always equal the canonical hash of
/// `(data, predicate)`; [`TokenState::new`] computes it and validation
/// re-checks it on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenState {
    pub state_hash: StateHash,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::serde_hex::opt_hex"
    )]
    pub data: Option<Bytes>,
    pub predicate: Predicate,
}

impl TokenState {
    /// Build a state, computing its hash from the canonical encoding.
    pub fn new(data: Option<Bytes>, predicate: Predicate) -> Self {
        let state_hash = canonical::state_hash(data.as_deref(), &predicate);
        Self {
            state_hash,
            data,
            predicate,
        }
    }

    /// Recompute the hash from the current fields.
    pub fn computed_hash(&self) -> StateHash {
        canonical::state_hash(self.data.as_deref(), &self.predicate)
    }
}
