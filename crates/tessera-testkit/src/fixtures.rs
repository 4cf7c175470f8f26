//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::{Arc, Once};

use tessera::{
    MintParams, ReceiveOptions, TokenSnapshot, TransferOptions, Wallet, WalletConfig,
};
use tessera_core::{
    Address, Ed25519Provider, Nonce, OwnerCredentials, SecretSeed, TokenType, TrustAnchor,
};
use tessera_ledger::InMemoryAggregator;

/// The wallet type every fixture hands out.
pub type FixtureWallet = Wallet<Arc<InMemoryAggregator>, Ed25519Provider>;

/// A test fixture with an in-memory aggregator and a wallet bound to it.
///
/// The aggregator is shared, so tests can wrap it in fault-injecting
/// clients or inspect it directly while the wallet keeps working.
pub struct TestFixture {
    pub aggregator: Arc<InMemoryAggregator>,
    pub wallet: FixtureWallet,
}

impl TestFixture {
    /// Create a fixture over a randomly keyed aggregator.
    pub fn new() -> Self {
        Self::from_aggregator(InMemoryAggregator::new())
    }

    /// Create with a deterministic aggregator key from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self::from_aggregator(InMemoryAggregator::with_seed(&seed))
    }

    fn from_aggregator(aggregator: InMemoryAggregator) -> Self {
        let aggregator = Arc::new(aggregator);
        let config = WalletConfig::new(aggregator.trust_anchor());
        let wallet = Wallet::new(Arc::clone(&aggregator), Ed25519Provider::new(), config);
        Self { aggregator, wallet }
    }

    /// The aggregator key snapshots are verified against.
    pub fn trust_anchor(&self) -> TrustAnchor {
        self.aggregator.trust_anchor()
    }

    /// Mint a token of the named type.
    pub async fn mint(&self, type_name: &str, owner: &OwnerCredentials) -> TokenSnapshot {
        self.mint_with(MintParams::new(TokenType::from_name(type_name)), owner)
            .await
    }

    /// Mint with explicit parameters.
    pub async fn mint_with(&self, params: MintParams, owner: &OwnerCredentials) -> TokenSnapshot {
        self.wallet
            .mint(params, owner)
            .await
            .expect("mint should succeed against the fixture aggregator")
    }

    /// The address a credential holder answers to for this token.
    pub fn address_for(&self, credentials: &OwnerCredentials, snapshot: &TokenSnapshot) -> Address {
        self.wallet
            .receiving_address(credentials, &snapshot.token_id(), &snapshot.token_type())
            .expect("credentials should yield an address")
    }

    /// Run a full offline hand-off from one holder to another.
    pub async fn handoff(
        &self,
        snapshot: &TokenSnapshot,
        from: &OwnerCredentials,
        to: &OwnerCredentials,
    ) -> TokenSnapshot {
        let recipient = self.address_for(to, snapshot);
        let artifact = self
            .wallet
            .prepare_offline(snapshot, from, &recipient, TransferOptions::default())
            .expect("prepare should succeed for the current holder");
        self.wallet
            .receive(&artifact, to, ReceiveOptions::default())
            .await
            .expect("receive should succeed for the named recipient")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Unmasked credentials derived from a one-byte seed pattern.
pub fn owner(index: u8) -> OwnerCredentials {
    OwnerCredentials::unmasked(SecretSeed::from_bytes([index; 32]))
}

/// Masked credentials derived from a one-byte seed pattern.
pub fn masked_owner(index: u8, nonce: [u8; 32]) -> OwnerCredentials {
    OwnerCredentials::masked(SecretSeed::from_bytes([index; 32]), Nonce::from_bytes(nonce))
}

/// Install a fmt subscriber once, so repeated test setup stays quiet.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera::{OwnershipScenario, SnapshotStatus};

    #[tokio::test]
    async fn test_fixture_mints_confirmed_tokens() {
        let fixture = TestFixture::new();
        let minted = fixture.mint("ticket", &owner(1)).await;

        assert_eq!(minted.status(), SnapshotStatus::Confirmed);
        assert_eq!(fixture.aggregator.len(), 1);
    }

    #[tokio::test]
    async fn test_handoff_rotates_ownership() {
        let fixture = TestFixture::new();
        let minted = fixture.mint("ticket", &owner(1)).await;

        let received = fixture.handoff(&minted, &owner(1), &owner(2)).await;
        assert_eq!(received.transaction_count(), 1);
        assert!(received.is_locally_spendable());

        let report = fixture
            .wallet
            .reconcile(&received)
            .await
            .expect("reconcile should reach the fixture aggregator");
        assert_eq!(report.scenario, Some(OwnershipScenario::Current));
    }

    #[tokio::test]
    async fn test_seeded_fixtures_share_an_aggregator_key() {
        let a = TestFixture::with_seed([7; 32]);
        let b = TestFixture::with_seed([7; 32]);

        let minted = a.mint("ticket", &owner(1)).await;
        minted
            .validate_with_anchor(&b.trust_anchor())
            .expect("same seed should produce the same signing key");
    }

    #[tokio::test]
    async fn test_owners_are_deterministic() {
        let fixture = TestFixture::new();
        let minted = fixture.mint("ticket", &owner(1)).await;

        assert_eq!(
            fixture.address_for(&owner(2), &minted),
            fixture.address_for(&owner(2), &minted)
        );
        assert_ne!(
            fixture.address_for(&owner(2), &minted),
            fixture.address_for(&owner(3), &minted)
        );
        assert_ne!(
            fixture.address_for(&owner(2), &minted),
            fixture.address_for(&masked_owner(2, [1; 32]), &minted)
        );
    }
}
