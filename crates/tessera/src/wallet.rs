//! The Wallet: unified API for Tessera tokens.
//!
//! The Wallet brings together minting, transfer, and reconciliation
//! behind one ledger connection and one crypto provider.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use tessera_core::{
    genesis_hash, Address, Authenticator, CoinData, Commitment, CryptoProvider, GenesisData,
    GenesisRecord, OwnerCredentials, RequestId, Salt, TokenId, TokenSnapshot,
    TokenState, TokenType, TrustAnchor,
};
use tessera_ledger::{await_inclusion, LedgerClient, SubmitOutcome};
use tessera_reconcile::{ReconcileConfig, ReconcileEngine, ReconcileReport};
use tessera_transfer::{ReceiveOptions, TransferConfig, TransferEngine, TransferOptions};

use crate::error::{Result, TesseraError};

/// Configuration for a wallet.
#[derive(Debug, Clone)]
pub struct WalletConfig {
    /// Aggregator key every ledger answer must verify against.
    pub trust_anchor: TrustAnchor,
    /// How long to wait for inclusion after submitting a commitment.
    pub proof_timeout: Duration,
    /// Interval between inclusion queries while waiting.
    pub poll_interval: Duration,
    /// Deadline for reconciliation queries.
    pub query_timeout: Duration,
}

impl WalletConfig {
    pub fn new(trust_anchor: TrustAnchor) -> Self {
        Self {
            trust_anchor,
            proof_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(500),
            query_timeout: Duration::from_secs(10),
        }
    }
}

/// Parameters for minting a token.
#[derive(Debug, Clone)]
pub struct MintParams {
    /// Asset class of the token.
    pub token_type: TokenType,
    /// Immutable data recorded at genesis, also the initial state data.
    pub initial_data: Option<Bytes>,
    /// Fungible denominations carried by the token.
    pub coin_data: Option<CoinData>,
    /// Mint salt; two mints with the same type and salt are the same
    /// token.
    pub salt: Salt,
}

impl MintParams {
    /// Parameters for a plain token of the given type with a random
    /// salt.
    pub fn new(token_type: TokenType) -> Self {
        Self {
            token_type,
            initial_data: None,
            coin_data: None,
            salt: Salt::random(),
        }
    }
}

/// The main wallet struct.
///
/// Generic over the ledger connection and the crypto provider, so the
/// same wallet code runs against an in-memory aggregator in tests and a
/// remote one in production.
pub struct Wallet<L: LedgerClient, P: CryptoProvider> {
    ledger: Arc<L>,
    provider: P,
    config: WalletConfig,
    transfer: TransferEngine<Arc<L>, P>,
    reconcile: ReconcileEngine<Arc<L>>,
}

impl<L: LedgerClient, P: CryptoProvider + Clone> Wallet<L, P> {
    /// Create a wallet over a ledger connection.
    pub fn new(ledger: L, provider: P, config: WalletConfig) -> Self {
        let ledger = Arc::new(ledger);
        let transfer = TransferEngine::new(
            ledger.clone(),
            provider.clone(),
            TransferConfig {
                trust_anchor: config.trust_anchor,
                proof_timeout: config.proof_timeout,
                poll_interval: config.poll_interval,
            },
        );
        let reconcile = ReconcileEngine::new(
            ledger.clone(),
            ReconcileConfig {
                trust_anchor: config.trust_anchor,
                query_timeout: config.query_timeout,
            },
        );
        Self {
            ledger,
            provider,
            config,
            transfer,
            reconcile,
        }
    }

    /// Get the ledger connection.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Get the trust anchor this wallet verifies against.
    pub fn trust_anchor(&self) -> &TrustAnchor {
        &self.config.trust_anchor
    }

    /// The address these credentials answer to for a given token.
    ///
    /// Recipients hand this address to the sender out of band; for
    /// masked credentials it is bound to the token and nonce.
    pub fn receiving_address(
        &self,
        credentials: &OwnerCredentials,
        token_id: &TokenId,
        token_type: &TokenType,
    ) -> Result<Address> {
        let predicate = self
            .provider
            .derive_predicate(credentials, token_id, token_type);
        Ok(predicate.address(token_id, token_type)?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Minting
    // ─────────────────────────────────────────────────────────────────────────

    /// Mint a token and anchor its genesis in the ledger.
    ///
    /// The genesis commitment is keyed by the owner key and the token id,
    /// so re-minting with identical parameters is idempotent while a
    /// different genesis record claiming the same token id surfaces as
    /// [`TesseraError::MintConflict`].
    pub async fn mint(
        &self,
        params: MintParams,
        owner: &OwnerCredentials,
    ) -> Result<TokenSnapshot> {
        let token_id = TokenId::derive(&params.token_type, &params.salt);
        let predicate = self
            .provider
            .derive_predicate(owner, &token_id, &params.token_type);
        let state = TokenState::new(params.initial_data.clone(), predicate.clone());

        let genesis = GenesisData {
            token_id,
            token_type: params.token_type,
            salt: params.salt,
            initial_data: params.initial_data,
            coin_data: params.coin_data,
        };
        let hash = genesis_hash(&genesis);
        let genesis_state = token_id.genesis_state();
        let request_id = RequestId::derive(&predicate.public_key, &genesis_state);
        let signature = self.provider.sign(
            owner,
            &token_id,
            &params.token_type,
            &Commitment::signing_message(&hash),
        );
        let commitment = Commitment {
            request_id,
            transaction_hash: hash,
            authenticator: Authenticator {
                public_key: predicate.public_key,
                signature,
                state_hash: genesis_state,
            },
        };

        match self.ledger.submit_commitment(&commitment).await? {
            SubmitOutcome::Accepted | SubmitOutcome::AlreadyExists => {}
            SubmitOutcome::Conflict { existing } => {
                return Err(TesseraError::MintConflict { existing });
            }
        }
        let proof = await_inclusion(
            &self.ledger,
            &request_id,
            self.config.proof_timeout,
            self.config.poll_interval,
        )
        .await?;
        if proof.transaction_hash != hash {
            return Err(TesseraError::MintConflict {
                existing: proof.transaction_hash,
            });
        }
        proof.verify(&self.config.trust_anchor)?;

        tracing::info!("Minted token {}", token_id);
        Ok(TokenSnapshot::minted(
            GenesisRecord {
                data: genesis,
                inclusion_proof: proof,
            },
            state,
        ))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transfer
    // ─────────────────────────────────────────────────────────────────────────

    /// Prepare an offline transfer artifact for a recipient.
    pub fn prepare_offline(
        &self,
        snapshot: &TokenSnapshot,
        credentials: &OwnerCredentials,
        recipient: &Address,
        options: TransferOptions,
    ) -> Result<TokenSnapshot> {
        Ok(self
            .transfer
            .prepare_offline(snapshot, credentials, recipient, options)?)
    }

    /// Transfer online: submit the spend and wait for inclusion.
    pub async fn send(
        &self,
        snapshot: &TokenSnapshot,
        credentials: &OwnerCredentials,
        recipient: &Address,
        options: TransferOptions,
    ) -> Result<TokenSnapshot> {
        Ok(self
            .transfer
            .send(snapshot, credentials, recipient, options)
            .await?)
    }

    /// Complete a received transfer artifact, taking ownership.
    pub async fn receive(
        &self,
        artifact: &TokenSnapshot,
        credentials: &OwnerCredentials,
        options: ReceiveOptions,
    ) -> Result<TokenSnapshot> {
        Ok(self.transfer.complete(artifact, credentials, options).await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reconciliation
    // ─────────────────────────────────────────────────────────────────────────

    /// Reconcile a snapshot against the ledger.
    pub async fn reconcile(&self, snapshot: &TokenSnapshot) -> Result<ReconcileReport> {
        Ok(self.reconcile.reconcile(snapshot).await?)
    }
}
