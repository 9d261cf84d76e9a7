//! Single submit-and-confirm path for every transaction this crate sends

use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    signature::{Keypair, Signature},
    transaction::Transaction,
};

/// Submits transactions and waits for them at a fixed commitment level
#[derive(Debug, Clone, Copy)]
pub struct TransactionSubmitter {
    commitment: CommitmentConfig,
    confirmation: RetryPolicy,
}

impl TransactionSubmitter {
    pub fn new(commitment: CommitmentConfig, confirmation: RetryPolicy) -> Self {
        Self {
            commitment,
            confirmation,
        }
    }

    pub fn commitment(&self) -> CommitmentConfig {
        self.commitment
    }

    /// Sign `transaction` with a fresh blockhash, send it, and poll its status
    /// until it reaches the configured commitment.
    ///
    /// `signers` must include the fee payer the transaction was built with.
    pub async fn submit<C: Connection + ?Sized>(
        &self,
        label: &str,
        conn: &C,
        mut transaction: Transaction,
        signers: &[&Keypair],
    ) -> Result<Signature> {
        log::debug!("Sending {} transaction", label);

        let blockhash = conn.get_latest_blockhash().await?;
        transaction
            .try_sign(signers, blockhash)
            .map_err(|e| Error::Signing {
                label: label.to_string(),
                reason: e.to_string(),
            })?;

        let signature = conn
            .send_transaction(&transaction, self.commitment)
            .await
            .map_err(|e| match e {
                Error::Rejected(error) => Error::Submission {
                    label: label.to_string(),
                    error,
                },
                other => other,
            })?;

        let commitment = self.commitment;
        let status = self
            .confirmation
            .poll(move |_| async move { conn.get_signature_status(&signature, commitment).await })
            .await?;

        match status {
            Some(Ok(())) => {
                log::debug!("{} confirmed: {}", label, signature);
                Ok(signature)
            }
            Some(Err(error)) => Err(Error::Submission {
                label: label.to_string(),
                error,
            }),
            None => Err(Error::ConfirmationTimeout {
                label: label.to_string(),
                signature,
                attempts: self.confirmation.max_attempts,
            }),
        }
    }
}
