//! The transfer engine.
//!
//! One engine serves both halves of the protocol. The sender prepares a
//! transfer, either keeping it offline as a pending artifact or pushing
//! it straight to the ledger; the receiver completes a pending artifact
//! by submitting the sender's commitment themselves and rotating the
//! token state to their own predicate.

use std::time::Duration;

use bytes::Bytes;

use tessera_core::{
    transfer_hash, Address, Authenticator, Commitment, CryptoProvider, Digest, InclusionProof,
    OwnerCredentials, PendingTransfer, RequestId, TokenSnapshot, TokenState, TransferData,
    TransferTransaction, TrustAnchor,
};
use tessera_ledger::{await_inclusion, LedgerClient, LedgerError, SubmitOutcome};

use crate::error::{Result, TransferError};

/// Configuration for a transfer engine.
#[derive(Debug, Clone)]
pub struct TransferConfig {
    /// Aggregator key every inclusion proof must verify against.
    pub trust_anchor: TrustAnchor,
    /// How long to wait for an inclusion proof after submitting.
    pub proof_timeout: Duration,
    /// Interval between inclusion queries while waiting.
    pub poll_interval: Duration,
}

impl TransferConfig {
    pub fn new(trust_anchor: TrustAnchor) -> Self {
        Self {
            trust_anchor,
            proof_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// Sender-side options for a transfer.
#[derive(Debug, Clone, Default)]
pub struct TransferOptions {
    /// Free-form note carried to the recipient.
    pub message: Option<String>,
    /// Commitment to the state data the recipient will adopt. The sender
    /// learns only this hash, never the data behind it.
    pub recipient_data_hash: Option<Digest>,
}

/// Receiver-side options when completing a transfer.
#[derive(Debug, Clone, Default)]
pub struct ReceiveOptions {
    /// Data for the recipient's new state. Required when the artifact
    /// carries a recipient data commitment.
    pub state_data: Option<Bytes>,
}

/// Drives the transfer protocol against a ledger.
pub struct TransferEngine<L, P> {
    ledger: L,
    provider: P,
    config: TransferConfig,
}

impl<L: LedgerClient, P: CryptoProvider> TransferEngine<L, P> {
    pub fn new(ledger: L, provider: P, config: TransferConfig) -> Self {
        Self {
            ledger,
            provider,
            config,
        }
    }

    /// Prepare a transfer without touching the ledger.
    ///
    /// The returned snapshot carries the signed commitment as a pending
    /// transfer and is the artifact handed to the recipient. The source
    /// snapshot is left as it was; nothing is spent until someone
    /// submits the commitment.
    pub fn prepare_offline(
        &self,
        snapshot: &TokenSnapshot,
        credentials: &OwnerCredentials,
        recipient: &Address,
        options: TransferOptions,
    ) -> Result<TokenSnapshot> {
        let pending = self.build_pending(snapshot, credentials, recipient, options)?;
        tracing::debug!("Prepared offline transfer to {}", pending.data.recipient);
        Ok(snapshot.with_pending_transfer(pending))
    }

    /// Transfer online: prepare, submit, and wait for inclusion.
    ///
    /// The returned snapshot records the confirmed transaction and is no
    /// longer spendable by the sender.
    pub async fn send(
        &self,
        snapshot: &TokenSnapshot,
        credentials: &OwnerCredentials,
        recipient: &Address,
        options: TransferOptions,
    ) -> Result<TokenSnapshot> {
        let pending = self.build_pending(snapshot, credentials, recipient, options)?;
        let proof = self.submit_and_await(&pending.commitment).await?;
        proof.verify(&self.config.trust_anchor)?;

        let transaction = TransferTransaction {
            data: pending.data,
            commitment: pending.commitment,
            inclusion_proof: proof,
        };
        Ok(snapshot.with_transaction(transaction))
    }

    /// Complete a received transfer artifact.
    ///
    /// Authenticates the caller against the artifact's recipient address,
    /// checks any recipient data commitment, submits the sender's
    /// commitment, and rotates the token state to the caller's predicate.
    /// Authentication happens before any ledger traffic, and submission
    /// is idempotent, so completing the same artifact twice converges on
    /// the same state.
    pub async fn complete(
        &self,
        artifact: &TokenSnapshot,
        credentials: &OwnerCredentials,
        options: ReceiveOptions,
    ) -> Result<TokenSnapshot> {
        artifact.validate_with_anchor(&self.config.trust_anchor)?;
        let pending = artifact
            .pending_transfer
            .as_ref()
            .ok_or(TransferError::NoPendingTransfer)?;

        let token_id = artifact.token_id();
        let token_type = artifact.token_type();
        let predicate = self
            .provider
            .derive_predicate(credentials, &token_id, &token_type);
        let address = predicate.address(&token_id, &token_type)?;
        if address != pending.data.recipient {
            return Err(TransferError::AuthenticationFailed);
        }

        match (&pending.data.recipient_data_hash, &options.state_data) {
            (Some(expected), Some(data)) => {
                if self.provider.digest(data) != *expected {
                    return Err(TransferError::DataCommitmentMismatch);
                }
            }
            (Some(_), None) => return Err(TransferError::MissingStateData),
            (None, _) => {}
        }

        let proof = self.submit_and_await(&pending.commitment).await?;
        proof.verify(&self.config.trust_anchor)?;

        let new_state = TokenState::new(options.state_data, predicate);
        artifact
            .confirm_pending(proof, new_state)
            .ok_or(TransferError::NoPendingTransfer)
    }

    /// Validate, authenticate, and sign a transfer of the current state.
    fn build_pending(
        &self,
        snapshot: &TokenSnapshot,
        credentials: &OwnerCredentials,
        recipient: &Address,
        options: TransferOptions,
    ) -> Result<PendingTransfer> {
        snapshot.validate_with_anchor(&self.config.trust_anchor)?;
        if snapshot.pending_transfer.is_some() {
            return Err(TransferError::TransferPending);
        }
        if !snapshot.is_locally_spendable() {
            return Err(TransferError::AlreadySpent);
        }

        let token_id = snapshot.token_id();
        let token_type = snapshot.token_type();
        let predicate = self
            .provider
            .derive_predicate(credentials, &token_id, &token_type);
        if predicate != *snapshot.owner_predicate() {
            return Err(TransferError::AuthenticationFailed);
        }

        let data = TransferData {
            source_state: snapshot.state.state_hash,
            recipient: *recipient,
            message: options.message,
            recipient_data_hash: options.recipient_data_hash,
        };
        let transaction_hash = transfer_hash(&data);
        let signature = self.provider.sign(
            credentials,
            &token_id,
            &token_type,
            &Commitment::signing_message(&transaction_hash),
        );
        let commitment = Commitment {
            request_id: RequestId::derive(&predicate.public_key, &data.source_state),
            transaction_hash,
            authenticator: Authenticator {
                public_key: predicate.public_key,
                signature,
                state_hash: data.source_state,
            },
        };

        Ok(PendingTransfer {
            sender: predicate.public_key,
            data,
            commitment,
        })
    }

    /// Submit a commitment and wait for its inclusion proof.
    ///
    /// `AlreadyExists` is a success; a conflict, or a proof carrying a
    /// different transaction hash, surfaces as a double spend.
    async fn submit_and_await(&self, commitment: &Commitment) -> Result<InclusionProof> {
        match self.ledger.submit_commitment(commitment).await? {
            SubmitOutcome::Accepted => {}
            SubmitOutcome::AlreadyExists => {
                tracing::debug!(
                    "Commitment for {:?} already registered",
                    commitment.request_id
                );
            }
            SubmitOutcome::Conflict { existing } => {
                tracing::warn!(
                    "Double spend detected for {:?}: ledger holds {}",
                    commitment.request_id,
                    existing
                );
                return Err(TransferError::DoubleSpend { existing });
            }
        }

        let proof = await_inclusion(
            &self.ledger,
            &commitment.request_id,
            self.config.proof_timeout,
            self.config.poll_interval,
        )
        .await
        .map_err(|e| match e {
            LedgerError::Timeout => TransferError::ProofTimeout,
            other => TransferError::Ledger(other),
        })?;

        if proof.transaction_hash != commitment.transaction_hash {
            return Err(TransferError::DoubleSpend {
                existing: proof.transaction_hash,
            });
        }
        Ok(proof)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tessera_core::{
        genesis_hash, Ed25519Provider, GenesisData, GenesisRecord, Salt, SecretSeed,
        SnapshotStatus, TokenType,
    };
    use tessera_ledger::{InMemoryAggregator, ProofResponse};

    use super::*;

    type TestEngine = TransferEngine<Arc<InMemoryAggregator>, Ed25519Provider>;

    fn test_engine(aggregator: &Arc<InMemoryAggregator>) -> TestEngine {
        TransferEngine::new(
            aggregator.clone(),
            Ed25519Provider::new(),
            TransferConfig::new(aggregator.trust_anchor()),
        )
    }

    fn credentials(seed: u8) -> OwnerCredentials {
        OwnerCredentials::unmasked(SecretSeed::from_bytes([seed; 32]))
    }

    fn address_for(owner: &OwnerCredentials, snapshot: &TokenSnapshot) -> Address {
        let provider = Ed25519Provider::new();
        provider
            .derive_predicate(owner, &snapshot.token_id(), &snapshot.token_type())
            .address(&snapshot.token_id(), &snapshot.token_type())
            .expect("derived predicate has an address")
    }

    /// Mint a token the way a wallet would: register the genesis
    /// commitment and anchor the snapshot with the resulting proof.
    async fn mint_snapshot(
        aggregator: &InMemoryAggregator,
        owner: &OwnerCredentials,
    ) -> TokenSnapshot {
        let provider = Ed25519Provider::new();
        let token_type = TokenType::from_name("engine-test");
        let salt = Salt::from_bytes([7; 32]);
        let token_id = tessera_core::TokenId::derive(&token_type, &salt);

        let predicate = provider.derive_predicate(owner, &token_id, &token_type);
        let state = TokenState::new(None, predicate.clone());

        let genesis = GenesisData {
            token_id,
            token_type,
            salt,
            initial_data: None,
            coin_data: None,
        };
        let hash = genesis_hash(&genesis);
        let genesis_state = token_id.genesis_state();
        let signature = provider.sign(
            owner,
            &token_id,
            &token_type,
            &Commitment::signing_message(&hash),
        );
        let commitment = Commitment {
            request_id: RequestId::derive(&predicate.public_key, &genesis_state),
            transaction_hash: hash,
            authenticator: Authenticator {
                public_key: predicate.public_key,
                signature,
                state_hash: genesis_state,
            },
        };
        aggregator
            .submit_commitment(&commitment)
            .await
            .expect("genesis commitment accepted");
        let proof = match aggregator
            .get_inclusion_proof(&commitment.request_id)
            .await
            .expect("genesis proof")
        {
            ProofResponse::Included(proof) => proof,
            ProofResponse::Excluded(_) => panic!("genesis must be included"),
        };

        TokenSnapshot::minted(
            GenesisRecord {
                data: genesis,
                inclusion_proof: proof,
            },
            state,
        )
    }

    #[tokio::test]
    async fn test_prepare_offline_attaches_pending() {
        let aggregator = Arc::new(InMemoryAggregator::with_seed(&[1; 32]));
        let engine = test_engine(&aggregator);
        let alice = credentials(10);
        let bob = credentials(11);

        let snapshot = mint_snapshot(&aggregator, &alice).await;
        let recipient = address_for(&bob, &snapshot);

        let artifact = engine
            .prepare_offline(&snapshot, &alice, &recipient, TransferOptions::default())
            .expect("prepare");

        assert_eq!(artifact.status(), SnapshotStatus::Pending);
        assert!(!artifact.is_locally_spendable());
        let pending = artifact.pending_transfer.as_ref().expect("pending");
        assert_eq!(pending.data.recipient, recipient);
        assert_eq!(pending.sender, snapshot.owner_predicate().public_key);
        artifact.validate().expect("artifact stays valid");

        // Preparing is a pure operation: the source snapshot is untouched
        // and only the genesis commitment has reached the ledger.
        assert!(snapshot.is_locally_spendable());
        assert_eq!(aggregator.len(), 1);
    }

    #[tokio::test]
    async fn test_prepare_offline_rejects_foreign_credentials() {
        let aggregator = Arc::new(InMemoryAggregator::with_seed(&[1; 32]));
        let engine = test_engine(&aggregator);
        let alice = credentials(10);
        let bob = credentials(11);

        let snapshot = mint_snapshot(&aggregator, &alice).await;
        let recipient = address_for(&bob, &snapshot);

        let err = engine
            .prepare_offline(&snapshot, &bob, &recipient, TransferOptions::default())
            .expect_err("bob cannot spend alice's token");
        assert!(matches!(err, TransferError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn test_prepare_offline_rejects_second_pending() {
        let aggregator = Arc::new(InMemoryAggregator::with_seed(&[1; 32]));
        let engine = test_engine(&aggregator);
        let alice = credentials(10);
        let bob = credentials(11);

        let snapshot = mint_snapshot(&aggregator, &alice).await;
        let recipient = address_for(&bob, &snapshot);

        let artifact = engine
            .prepare_offline(&snapshot, &alice, &recipient, TransferOptions::default())
            .expect("first prepare");
        let err = engine
            .prepare_offline(&artifact, &alice, &recipient, TransferOptions::default())
            .expect_err("second prepare must fail");
        assert!(matches!(err, TransferError::TransferPending));
    }

    #[tokio::test]
    async fn test_send_records_confirmed_transaction() {
        let aggregator = Arc::new(InMemoryAggregator::with_seed(&[1; 32]));
        let engine = test_engine(&aggregator);
        let alice = credentials(10);
        let bob = credentials(11);

        let snapshot = mint_snapshot(&aggregator, &alice).await;
        let recipient = address_for(&bob, &snapshot);

        let spent = engine
            .send(&snapshot, &alice, &recipient, TransferOptions::default())
            .await
            .expect("send");

        assert_eq!(spent.status(), SnapshotStatus::Transferred);
        assert!(!spent.is_locally_spendable());
        assert_eq!(spent.transaction_count(), 1);
        let transaction = &spent.transactions[0];
        assert_eq!(transaction.data.recipient, recipient);
        transaction
            .inclusion_proof
            .verify(&aggregator.trust_anchor())
            .expect("proof verifies");
        spent.validate().expect("spent snapshot stays valid");
    }

    #[tokio::test]
    async fn test_send_detects_double_spend() {
        let aggregator = Arc::new(InMemoryAggregator::with_seed(&[1; 32]));
        let engine = test_engine(&aggregator);
        let alice = credentials(10);
        let bob = credentials(11);
        let carol = credentials(12);

        let snapshot = mint_snapshot(&aggregator, &alice).await;
        let to_bob = address_for(&bob, &snapshot);
        let to_carol = address_for(&carol, &snapshot);

        engine
            .send(&snapshot, &alice, &to_bob, TransferOptions::default())
            .await
            .expect("first spend");

        // Replays from the stale snapshot race the recorded spend.
        let err = engine
            .send(&snapshot, &alice, &to_carol, TransferOptions::default())
            .await
            .expect_err("second spend of the same state must fail");
        assert!(matches!(err, TransferError::DoubleSpend { .. }));
    }

    #[tokio::test]
    async fn test_complete_rotates_ownership() {
        let aggregator = Arc::new(InMemoryAggregator::with_seed(&[1; 32]));
        let engine = test_engine(&aggregator);
        let alice = credentials(10);
        let bob = credentials(11);

        let snapshot = mint_snapshot(&aggregator, &alice).await;
        let recipient = address_for(&bob, &snapshot);
        let artifact = engine
            .prepare_offline(&snapshot, &alice, &recipient, TransferOptions::default())
            .expect("prepare");

        let received = engine
            .complete(&artifact, &bob, ReceiveOptions::default())
            .await
            .expect("complete");

        assert_eq!(received.status(), SnapshotStatus::Transferred);
        assert!(received.is_locally_spendable());
        assert_eq!(received.transaction_count(), 1);
        let provider = Ed25519Provider::new();
        let bob_predicate =
            provider.derive_predicate(&bob, &received.token_id(), &received.token_type());
        assert_eq!(*received.owner_predicate(), bob_predicate);
        received
            .validate_with_anchor(&aggregator.trust_anchor())
            .expect("received snapshot fully verifies");
    }

    #[tokio::test]
    async fn test_complete_rejects_wrong_recipient() {
        let aggregator = Arc::new(InMemoryAggregator::with_seed(&[1; 32]));
        let engine = test_engine(&aggregator);
        let alice = credentials(10);
        let bob = credentials(11);
        let carol = credentials(12);

        let snapshot = mint_snapshot(&aggregator, &alice).await;
        let recipient = address_for(&bob, &snapshot);
        let artifact = engine
            .prepare_offline(&snapshot, &alice, &recipient, TransferOptions::default())
            .expect("prepare");

        let err = engine
            .complete(&artifact, &carol, ReceiveOptions::default())
            .await
            .expect_err("carol cannot claim bob's transfer");
        assert!(matches!(err, TransferError::AuthenticationFailed));
        // Authentication failures never reach the ledger.
        assert_eq!(aggregator.len(), 1);
    }

    #[tokio::test]
    async fn test_complete_enforces_data_commitment() {
        let aggregator = Arc::new(InMemoryAggregator::with_seed(&[1; 32]));
        let engine = test_engine(&aggregator);
        let alice = credentials(10);
        let bob = credentials(11);

        let snapshot = mint_snapshot(&aggregator, &alice).await;
        let recipient = address_for(&bob, &snapshot);
        let provider = Ed25519Provider::new();

        let secret_data = Bytes::from_static(b"serial number 8431");
        let options = TransferOptions {
            message: Some("warranty card".to_string()),
            recipient_data_hash: Some(provider.digest(&secret_data)),
        };
        let artifact = engine
            .prepare_offline(&snapshot, &alice, &recipient, options)
            .expect("prepare");

        let err = engine
            .complete(&artifact, &bob, ReceiveOptions { state_data: None })
            .await
            .expect_err("committed data must be supplied");
        assert!(matches!(err, TransferError::MissingStateData));

        let err = engine
            .complete(
                &artifact,
                &bob,
                ReceiveOptions {
                    state_data: Some(Bytes::from_static(b"forged")),
                },
            )
            .await
            .expect_err("wrong data must be rejected");
        assert!(matches!(err, TransferError::DataCommitmentMismatch));

        let received = engine
            .complete(
                &artifact,
                &bob,
                ReceiveOptions {
                    state_data: Some(secret_data.clone()),
                },
            )
            .await
            .expect("matching data accepted");
        assert_eq!(received.state.data, Some(secret_data));
    }

    #[tokio::test]
    async fn test_complete_is_idempotent() {
        let aggregator = Arc::new(InMemoryAggregator::with_seed(&[1; 32]));
        let engine = test_engine(&aggregator);
        let alice = credentials(10);
        let bob = credentials(11);

        let snapshot = mint_snapshot(&aggregator, &alice).await;
        let recipient = address_for(&bob, &snapshot);
        let artifact = engine
            .prepare_offline(&snapshot, &alice, &recipient, TransferOptions::default())
            .expect("prepare");

        let first = engine
            .complete(&artifact, &bob, ReceiveOptions::default())
            .await
            .expect("first completion");
        let second = engine
            .complete(&artifact, &bob, ReceiveOptions::default())
            .await
            .expect("second completion");

        assert_eq!(first.state.state_hash, second.state.state_hash);
        assert_eq!(first.transaction_count(), second.transaction_count());
        assert_eq!(aggregator.len(), 2);
    }

    #[tokio::test]
    async fn test_complete_without_pending() {
        let aggregator = Arc::new(InMemoryAggregator::with_seed(&[1; 32]));
        let engine = test_engine(&aggregator);
        let alice = credentials(10);

        let snapshot = mint_snapshot(&aggregator, &alice).await;
        let err = engine
            .complete(&snapshot, &alice, ReceiveOptions::default())
            .await
            .expect_err("nothing to complete");
        assert!(matches!(err, TransferError::NoPendingTransfer));
    }

    #[tokio::test]
    async fn test_complete_with_masked_recipient() {
        let aggregator = Arc::new(InMemoryAggregator::with_seed(&[1; 32]));
        let engine = test_engine(&aggregator);
        let alice = credentials(10);
        let bob = OwnerCredentials::masked(
            SecretSeed::from_bytes([11; 32]),
            tessera_core::Nonce::from_bytes([42; 32]),
        );

        let snapshot = mint_snapshot(&aggregator, &alice).await;
        let recipient = address_for(&bob, &snapshot);
        let artifact = engine
            .prepare_offline(&snapshot, &alice, &recipient, TransferOptions::default())
            .expect("prepare");

        // The same secret under a different nonce answers to a different
        // address.
        let wrong_nonce = OwnerCredentials::masked(
            SecretSeed::from_bytes([11; 32]),
            tessera_core::Nonce::from_bytes([43; 32]),
        );
        let err = engine
            .complete(&artifact, &wrong_nonce, ReceiveOptions::default())
            .await
            .expect_err("wrong nonce must not authenticate");
        assert!(matches!(err, TransferError::AuthenticationFailed));

        let received = engine
            .complete(&artifact, &bob, ReceiveOptions::default())
            .await
            .expect("masked completion");
        assert!(received.owner_predicate().is_masked());
        received
            .validate_with_anchor(&aggregator.trust_anchor())
            .expect("masked snapshot fully verifies");
    }
}
