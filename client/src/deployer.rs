//! Program deployment through the upgradeable BPF loader

use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::funder::AccountFunder;
use crate::retry::RetryPolicy;
use crate::submitter::TransactionSubmitter;
use solana_sdk::{
    bpf_loader_upgradeable::{self, UpgradeableLoaderState},
    message::Message,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::Transaction,
};

/// Bytes of program binary written per transaction
pub const CHUNK_SIZE: usize = 900;

/// Extra lamports given to the temporary deploy payer
pub const DEPLOY_MARGIN_LAMPORTS: u64 = 100_000_000;

/// Lamports a deployment consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployCost {
    pub buffer_rent: u64,
    pub programdata_rent: u64,
    pub program_rent: u64,
    pub fees: u64,
}

impl DeployCost {
    pub fn total(&self) -> u64 {
        self.buffer_rent + self.programdata_rent + self.program_rent + self.fees
    }
}

pub fn chunk_count(program_len: usize) -> usize {
    program_len.div_ceil(CHUNK_SIZE)
}

#[derive(Debug, Clone, Copy)]
pub struct ProgramDeployer {
    submitter: TransactionSubmitter,
    funder: AccountFunder,
    chunk_upload: RetryPolicy,
}

impl ProgramDeployer {
    pub fn new(
        submitter: TransactionSubmitter,
        funder: AccountFunder,
        chunk_upload: RetryPolicy,
    ) -> Self {
        Self {
            submitter,
            funder,
            chunk_upload,
        }
    }

    /// Rent for the buffer, program-data and program accounts plus one fee per
    /// signature: one per chunk, two for the buffer and two for the deploy.
    pub async fn cost<C: Connection + ?Sized>(
        &self,
        conn: &C,
        program_len: usize,
    ) -> Result<DeployCost> {
        let buffer_rent = conn
            .get_minimum_balance_for_rent_exemption(UpgradeableLoaderState::size_of_buffer(
                program_len,
            ))
            .await?;
        let programdata_rent = conn
            .get_minimum_balance_for_rent_exemption(UpgradeableLoaderState::size_of_programdata(
                program_len,
            ))
            .await?;
        let program_rent = conn
            .get_minimum_balance_for_rent_exemption(UpgradeableLoaderState::size_of_program())
            .await?;

        // A chunk write signed by a single key costs exactly one signature
        let signer = Pubkey::new_unique();
        let write = bpf_loader_upgradeable::write(&signer, &signer, 0, vec![0; CHUNK_SIZE]);
        let blockhash = conn.get_latest_blockhash().await?;
        let message = Message::new_with_blockhash(&[write], Some(&signer), &blockhash);
        let fee_per_signature = conn.get_fee_for_message(&message).await?;
        let signatures = chunk_count(program_len) as u64 + 4;

        Ok(DeployCost {
            buffer_rent,
            programdata_rent,
            program_rent,
            fees: fee_per_signature * signatures,
        })
    }

    /// Deploy `binary` and return the new program's address.
    ///
    /// A failed deployment leaves the funded payer and partially written
    /// buffer on the ledger.
    pub async fn deploy<C: Connection + ?Sized>(&self, conn: &C, binary: &[u8]) -> Result<Pubkey> {
        let cost = self.cost(conn, binary.len()).await?;
        let payer = Keypair::new();
        self.funder
            .fund(conn, &payer.pubkey(), cost.total() + DEPLOY_MARGIN_LAMPORTS)
            .await?;
        log::info!(
            "Deploying {} byte program in {} chunks (payer {})",
            binary.len(),
            chunk_count(binary.len()),
            payer.pubkey()
        );

        let buffer = Keypair::new();
        let create_buffer = bpf_loader_upgradeable::create_buffer(
            &payer.pubkey(),
            &buffer.pubkey(),
            &payer.pubkey(),
            cost.buffer_rent,
            binary.len(),
        )?;
        let transaction = Transaction::new_with_payer(&create_buffer, Some(&payer.pubkey()));
        self.submitter
            .submit("create program buffer", conn, transaction, &[&payer, &buffer])
            .await?;

        for (index, chunk) in binary.chunks(CHUNK_SIZE).enumerate() {
            self.write_chunk(conn, &payer, &buffer.pubkey(), index * CHUNK_SIZE, chunk)
                .await?;
        }

        let program = Keypair::new();
        let deploy = bpf_loader_upgradeable::deploy_with_max_program_len(
            &payer.pubkey(),
            &program.pubkey(),
            &buffer.pubkey(),
            &payer.pubkey(),
            cost.program_rent,
            binary.len(),
        )?;
        let transaction = Transaction::new_with_payer(&deploy, Some(&payer.pubkey()));
        self.submitter
            .submit("deploy program", conn, transaction, &[&payer, &program])
            .await?;

        log::info!("Program deployed at {}", program.pubkey());
        Ok(program.pubkey())
    }

    async fn write_chunk<C: Connection + ?Sized>(
        &self,
        conn: &C,
        payer: &Keypair,
        buffer: &Pubkey,
        offset: usize,
        chunk: &[u8],
    ) -> Result<()> {
        let submitter = self.submitter;
        let max_attempts = self.chunk_upload.max_attempts;

        let written = self
            .chunk_upload
            .poll(move |attempt| {
                let write = bpf_loader_upgradeable::write(
                    buffer,
                    &payer.pubkey(),
                    offset as u32,
                    chunk.to_vec(),
                );
                let transaction = Transaction::new_with_payer(&[write], Some(&payer.pubkey()));
                async move {
                    match submitter
                        .submit("write program chunk", conn, transaction, &[payer])
                        .await
                    {
                        Ok(_) => Ok(Some(())),
                        Err(e @ (Error::Submission { .. } | Error::ConfirmationTimeout { .. })) => {
                            log::warn!(
                                "Chunk at offset {} failed (attempt {}/{}): {}",
                                offset,
                                attempt,
                                max_attempts,
                                e
                            );
                            Ok(None)
                        }
                        Err(e) => Err(e),
                    }
                }
            })
            .await?;

        written.ok_or(Error::ChunkUpload {
            offset,
            attempts: max_attempts,
        })
    }
}
