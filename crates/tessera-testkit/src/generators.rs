//! Proptest generators for property-based testing.

use bytes::Bytes;
use proptest::prelude::*;

use tessera_core::{
    Address, CoinData, CoinId, CryptoProvider, Digest, Ed25519Provider, Keypair, Nonce,
    OwnerCredentials, Salt, SecretSeed, StateHash, TokenId, TokenState, TokenType, TransferData,
};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random digest.
pub fn digest() -> impl Strategy<Value = Digest> {
    any::<[u8; 32]>().prop_map(Digest::from_bytes)
}

/// Generate a random state hash.
pub fn state_hash() -> impl Strategy<Value = StateHash> {
    any::<[u8; 32]>().prop_map(StateHash::from_bytes)
}

/// Generate a random address.
pub fn address() -> impl Strategy<Value = Address> {
    any::<[u8; 32]>().prop_map(Address::from_bytes)
}

/// Generate a random salt.
pub fn salt() -> impl Strategy<Value = Salt> {
    any::<[u8; 32]>().prop_map(Salt::from_bytes)
}

/// Generate a token type from a plausible name.
pub fn token_type() -> impl Strategy<Value = TokenType> {
    "[a-z][a-z0-9-]{0,31}".prop_map(|name| TokenType::from_name(&name))
}

/// Generate a derived token id.
pub fn token_id() -> impl Strategy<Value = TokenId> {
    (token_type(), salt()).prop_map(|(token_type, salt)| TokenId::derive(&token_type, &salt))
}

/// Generate unmasked or masked owner credentials.
pub fn credentials() -> impl Strategy<Value = OwnerCredentials> {
    (any::<[u8; 32]>(), any::<Option<[u8; 32]>>()).prop_map(|(seed, nonce)| {
        let secret = SecretSeed::from_bytes(seed);
        match nonce {
            Some(nonce) => OwnerCredentials::masked(secret, Nonce::from_bytes(nonce)),
            None => OwnerCredentials::unmasked(secret),
        }
    })
}

/// Generate coin data with up to `max_coins` denominations.
pub fn coin_data(max_coins: usize) -> impl Strategy<Value = CoinData> {
    prop::collection::vec((any::<[u8; 32]>(), 1u64..=1_000_000u64), 0..=max_coins).prop_map(
        |coins| {
            coins.into_iter().fold(CoinData::new(), |data, (id, amount)| {
                data.with_coin(CoinId::from_bytes(id), amount)
            })
        },
    )
}

/// Generate transfer data with an optional message and data commitment.
pub fn transfer_data() -> impl Strategy<Value = TransferData> {
    (
        state_hash(),
        address(),
        prop::option::of("[ -~]{0,64}"),
        prop::option::of(digest()),
    )
        .prop_map(
            |(source_state, recipient, message, recipient_data_hash)| TransferData {
                source_state,
                recipient,
                message,
                recipient_data_hash,
            },
        )
}

/// Parameters for deterministically rebuilding a token state.
#[derive(Debug, Clone)]
pub struct StateParams {
    pub owner_seed: [u8; 32],
    pub nonce: Option<[u8; 32]>,
    pub token_seed: [u8; 32],
    pub type_name: String,
    pub data: Option<Vec<u8>>,
}

impl Arbitrary for StateParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            any::<[u8; 32]>(),
            any::<Option<[u8; 32]>>(),
            any::<[u8; 32]>(),
            "[a-z][a-z0-9-]{0,31}",
            prop::option::of(prop::collection::vec(any::<u8>(), 0..=256)),
        )
            .prop_map(|(owner_seed, nonce, token_seed, type_name, data)| StateParams {
                owner_seed,
                nonce,
                token_seed,
                type_name,
                data,
            })
            .boxed()
    }
}

/// Build the token state the parameters describe.
pub fn state_from_params(params: &StateParams) -> TokenState {
    let token_type = TokenType::from_name(&params.type_name);
    let token_id = TokenId::derive(&token_type, &Salt::from_bytes(params.token_seed));
    let secret = SecretSeed::from_bytes(params.owner_seed);
    let credentials = match params.nonce {
        Some(nonce) => OwnerCredentials::masked(secret, Nonce::from_bytes(nonce)),
        None => OwnerCredentials::unmasked(secret),
    };
    let predicate = Ed25519Provider::new().derive_predicate(&credentials, &token_id, &token_type);
    TokenState::new(params.data.clone().map(Bytes::from), predicate)
}
