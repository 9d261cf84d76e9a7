//! Error types

use crate::bootstrap::BootstrapStep;
use solana_sdk::{
    instruction::InstructionError, program_error::ProgramError, pubkey::Pubkey,
    signature::Signature, transaction::TransactionError,
};
use std::time::Duration;
use thiserror::Error;

/// Custom error codes raised by the on-chain stable swap program.
pub mod swap_error_code {
    /// The swap account cannot be initialized because it is already in use.
    pub const ALREADY_IN_USE: u32 = 0;
    /// The instruction would exceed the caller's slippage limit.
    pub const EXCEEDED_SLIPPAGE: u32 = 14;
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("RPC error: {0}")]
    Network(String),

    #[error("Transaction rejected by the cluster: {0}")]
    Rejected(TransactionError),

    #[error("{label} transaction failed: {error}")]
    Submission {
        label: String,
        error: TransactionError,
    },

    #[error("{label} transaction {signature} not confirmed after {attempts} status polls")]
    ConfirmationTimeout {
        label: String,
        signature: Signature,
        attempts: u32,
    },

    #[error("Failed to sign {label} transaction: {reason}")]
    Signing { label: String, reason: String },

    #[error(
        "Airdrop to {address} not observed after {attempts} polls: \
         expected {expected} lamports, observed {observed}"
    )]
    FundingTimeout {
        address: Pubkey,
        expected: u64,
        observed: u64,
        attempts: u32,
    },

    #[error("No nonce derives an off-curve address for program {program_id}")]
    NoValidNonce { program_id: Pubkey },

    #[error("Account not found: {0}")]
    AccountNotFound(Pubkey),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Authority {authority} is not derived from swap account {swap}")]
    AuthorityMismatch { authority: Pubkey, swap: Pubkey },

    #[error("Stable swap account {0} is already initialized")]
    AlreadyInitialized(Pubkey),

    #[error("Instruction exceeds the requested slippage limit")]
    SlippageExceeded,

    #[error("Program chunk at offset {offset} failed to upload after {attempts} attempts")]
    ChunkUpload { offset: usize, attempts: u32 },

    #[error("Failed to build instruction: {0}")]
    Instruction(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Program {0} has no deployed address and no binary to deploy")]
    ProgramNotDeployed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Bootstrap step '{step}' failed: {source}")]
    Bootstrap {
        step: BootstrapStep,
        source: Box<Error>,
    },

    #[error("Bootstrap did not finish within {0:?}")]
    BootstrapTimeout(Duration),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<ProgramError> for Error {
    fn from(err: ProgramError) -> Self {
        Error::Instruction(err.to_string())
    }
}

impl From<InstructionError> for Error {
    fn from(err: InstructionError) -> Self {
        Error::Instruction(err.to_string())
    }
}

impl Error {
    /// Custom program error code raised by the instruction at `instruction_index`.
    pub fn custom_program_error(&self, instruction_index: u8) -> Option<u32> {
        match self {
            Error::Submission {
                error: TransactionError::InstructionError(index, InstructionError::Custom(code)),
                ..
            } if *index == instruction_index => Some(*code),
            _ => None,
        }
    }

    /// Maps stable swap program errors raised by the instruction at
    /// `instruction_index` onto their client-side variants.
    pub(crate) fn relay_swap_error(self, swap: Pubkey, instruction_index: u8) -> Self {
        match self.custom_program_error(instruction_index) {
            Some(swap_error_code::ALREADY_IN_USE) => Error::AlreadyInitialized(swap),
            Some(swap_error_code::EXCEEDED_SLIPPAGE) => Error::SlippageExceeded,
            _ => self,
        }
    }

    /// Attaches the bootstrap step that produced this error.
    pub(crate) fn during(self, step: BootstrapStep) -> Self {
        Error::Bootstrap {
            step,
            source: Box::new(self),
        }
    }

    /// The bootstrap step this error was raised in, if any.
    pub fn step(&self) -> Option<BootstrapStep> {
        match self {
            Error::Bootstrap { step, .. } => Some(*step),
            _ => None,
        }
    }
}
