//! Ledger RPC seam
//!
//! Every operation takes a `Connection` explicitly so tests can run against
//! an in-memory ledger and callers can talk to several clusters at once.

use crate::error::{Error, Result};
use async_trait::async_trait;
use solana_client::{
    client_error::ClientError, nonblocking::rpc_client::RpcClient,
    rpc_config::RpcSendTransactionConfig,
};
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    hash::Hash,
    message::Message,
    pubkey::Pubkey,
    signature::Signature,
    transaction::{Transaction, TransactionError},
};

#[async_trait]
pub trait Connection: Send + Sync {
    async fn request_airdrop(&self, address: &Pubkey, lamports: u64) -> Result<Signature>;

    async fn get_balance(&self, address: &Pubkey) -> Result<u64>;

    async fn get_latest_blockhash(&self) -> Result<Hash>;

    async fn get_fee_for_message(&self, message: &Message) -> Result<u64>;

    async fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64>;

    /// `Ok(None)` when the account does not exist.
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>>;

    /// Send with preflight at `commitment`.
    async fn send_transaction(
        &self,
        transaction: &Transaction,
        commitment: CommitmentConfig,
    ) -> Result<Signature>;

    /// `Ok(None)` while the signature has not reached `commitment`.
    async fn get_signature_status(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> Result<Option<std::result::Result<(), TransactionError>>>;
}

impl From<ClientError> for Error {
    fn from(err: ClientError) -> Self {
        match err.get_transaction_error() {
            Some(tx_err) => Error::Rejected(tx_err),
            None => Error::Network(err.to_string()),
        }
    }
}

#[async_trait]
impl Connection for RpcClient {
    async fn request_airdrop(&self, address: &Pubkey, lamports: u64) -> Result<Signature> {
        Ok(RpcClient::request_airdrop(self, address, lamports).await?)
    }

    async fn get_balance(&self, address: &Pubkey) -> Result<u64> {
        Ok(RpcClient::get_balance(self, address).await?)
    }

    async fn get_latest_blockhash(&self) -> Result<Hash> {
        Ok(RpcClient::get_latest_blockhash(self).await?)
    }

    async fn get_fee_for_message(&self, message: &Message) -> Result<u64> {
        Ok(RpcClient::get_fee_for_message(self, message).await?)
    }

    async fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64> {
        Ok(RpcClient::get_minimum_balance_for_rent_exemption(self, data_len).await?)
    }

    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>> {
        let response = self
            .get_account_with_commitment(address, self.commitment())
            .await?;
        Ok(response.value)
    }

    async fn send_transaction(
        &self,
        transaction: &Transaction,
        commitment: CommitmentConfig,
    ) -> Result<Signature> {
        let config = RpcSendTransactionConfig {
            skip_preflight: false,
            preflight_commitment: Some(commitment.commitment),
            ..RpcSendTransactionConfig::default()
        };
        Ok(self.send_transaction_with_config(transaction, config).await?)
    }

    async fn get_signature_status(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
    ) -> Result<Option<std::result::Result<(), TransactionError>>> {
        Ok(self
            .get_signature_status_with_commitment(signature, commitment)
            .await?)
    }
}
