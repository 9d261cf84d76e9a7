//! Stable swap instruction builders
//!
//! Wire format: a one-byte tag followed by the fields in declaration order,
//! integers little-endian.

use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

/// Instructions understood by the stable swap program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapInstruction {
    Initialize {
        nonce: u8,
        amp_factor: u64,
        fee_numerator: u64,
        fee_denominator: u64,
    },
    Swap {
        amount_in: u64,
        minimum_amount_out: u64,
    },
    Deposit {
        token_a_amount: u64,
        token_b_amount: u64,
        min_mint_amount: u64,
    },
    Withdraw {
        pool_token_amount: u64,
        minimum_token_a_amount: u64,
        minimum_token_b_amount: u64,
    },
}

impl SwapInstruction {
    pub fn tag(&self) -> u8 {
        match self {
            Self::Initialize { .. } => 0,
            Self::Swap { .. } => 1,
            Self::Deposit { .. } => 2,
            Self::Withdraw { .. } => 3,
        }
    }

    pub fn pack(&self) -> Vec<u8> {
        let mut data = vec![self.tag()];
        match *self {
            Self::Initialize {
                nonce,
                amp_factor,
                fee_numerator,
                fee_denominator,
            } => {
                data.push(nonce);
                data.extend_from_slice(&amp_factor.to_le_bytes());
                data.extend_from_slice(&fee_numerator.to_le_bytes());
                data.extend_from_slice(&fee_denominator.to_le_bytes());
            }
            Self::Swap {
                amount_in,
                minimum_amount_out,
            } => {
                data.extend_from_slice(&amount_in.to_le_bytes());
                data.extend_from_slice(&minimum_amount_out.to_le_bytes());
            }
            Self::Deposit {
                token_a_amount,
                token_b_amount,
                min_mint_amount,
            } => {
                data.extend_from_slice(&token_a_amount.to_le_bytes());
                data.extend_from_slice(&token_b_amount.to_le_bytes());
                data.extend_from_slice(&min_mint_amount.to_le_bytes());
            }
            Self::Withdraw {
                pool_token_amount,
                minimum_token_a_amount,
                minimum_token_b_amount,
            } => {
                data.extend_from_slice(&pool_token_amount.to_le_bytes());
                data.extend_from_slice(&minimum_token_a_amount.to_le_bytes());
                data.extend_from_slice(&minimum_token_b_amount.to_le_bytes());
            }
        }
        data
    }
}

/// Accounts shared by every instruction that moves tokens through the pool
#[derive(Debug, Clone, Copy)]
pub struct PoolAccounts<'a> {
    pub program_id: &'a Pubkey,
    pub token_program_id: &'a Pubkey,
    pub swap: &'a Pubkey,
    pub authority: &'a Pubkey,
}

/// Build the initialize instruction
#[allow(clippy::too_many_arguments)]
pub fn initialize(
    pool: PoolAccounts<'_>,
    mint_a: &Pubkey,
    token_account_a: &Pubkey,
    mint_b: &Pubkey,
    token_account_b: &Pubkey,
    pool_mint: &Pubkey,
    destination: &Pubkey,
    nonce: u8,
    amp_factor: u64,
    fee_numerator: u64,
    fee_denominator: u64,
) -> Instruction {
    let data = SwapInstruction::Initialize {
        nonce,
        amp_factor,
        fee_numerator,
        fee_denominator,
    }
    .pack();

    let accounts = vec![
        AccountMeta::new(*pool.swap, false),
        AccountMeta::new_readonly(*pool.authority, false),
        AccountMeta::new_readonly(*mint_a, false),
        AccountMeta::new_readonly(*token_account_a, false),
        AccountMeta::new_readonly(*mint_b, false),
        AccountMeta::new_readonly(*token_account_b, false),
        AccountMeta::new(*pool_mint, false),
        AccountMeta::new(*destination, false),
        AccountMeta::new_readonly(*pool.token_program_id, false),
    ];

    Instruction {
        program_id: *pool.program_id,
        accounts,
        data,
    }
}

/// Build the deposit instruction
///
/// The authority must already be approved as delegate on both source accounts.
#[allow(clippy::too_many_arguments)]
pub fn deposit(
    pool: PoolAccounts<'_>,
    source_a: &Pubkey,
    source_b: &Pubkey,
    token_account_a: &Pubkey,
    token_account_b: &Pubkey,
    pool_mint: &Pubkey,
    destination: &Pubkey,
    token_a_amount: u64,
    token_b_amount: u64,
    min_mint_amount: u64,
) -> Instruction {
    let data = SwapInstruction::Deposit {
        token_a_amount,
        token_b_amount,
        min_mint_amount,
    }
    .pack();

    let accounts = vec![
        AccountMeta::new_readonly(*pool.swap, false),
        AccountMeta::new_readonly(*pool.authority, false),
        AccountMeta::new(*source_a, false),
        AccountMeta::new(*source_b, false),
        AccountMeta::new(*token_account_a, false),
        AccountMeta::new(*token_account_b, false),
        AccountMeta::new(*pool_mint, false),
        AccountMeta::new(*destination, false),
        AccountMeta::new_readonly(*pool.token_program_id, false),
    ];

    Instruction {
        program_id: *pool.program_id,
        accounts,
        data,
    }
}

/// Build the withdraw instruction
#[allow(clippy::too_many_arguments)]
pub fn withdraw(
    pool: PoolAccounts<'_>,
    pool_mint: &Pubkey,
    source: &Pubkey,
    token_account_a: &Pubkey,
    token_account_b: &Pubkey,
    destination_a: &Pubkey,
    destination_b: &Pubkey,
    pool_token_amount: u64,
    minimum_token_a_amount: u64,
    minimum_token_b_amount: u64,
) -> Instruction {
    let data = SwapInstruction::Withdraw {
        pool_token_amount,
        minimum_token_a_amount,
        minimum_token_b_amount,
    }
    .pack();

    let accounts = vec![
        AccountMeta::new_readonly(*pool.swap, false),
        AccountMeta::new_readonly(*pool.authority, false),
        AccountMeta::new(*pool_mint, false),
        AccountMeta::new(*source, false),
        AccountMeta::new(*token_account_a, false),
        AccountMeta::new(*token_account_b, false),
        AccountMeta::new(*destination_a, false),
        AccountMeta::new(*destination_b, false),
        AccountMeta::new_readonly(*pool.token_program_id, false),
    ];

    Instruction {
        program_id: *pool.program_id,
        accounts,
        data,
    }
}

/// Build the swap instruction
#[allow(clippy::too_many_arguments)]
pub fn swap(
    pool: PoolAccounts<'_>,
    source: &Pubkey,
    swap_source: &Pubkey,
    swap_destination: &Pubkey,
    destination: &Pubkey,
    amount_in: u64,
    minimum_amount_out: u64,
) -> Instruction {
    let data = SwapInstruction::Swap {
        amount_in,
        minimum_amount_out,
    }
    .pack();

    let accounts = vec![
        AccountMeta::new_readonly(*pool.swap, false),
        AccountMeta::new_readonly(*pool.authority, false),
        AccountMeta::new(*source, false),
        AccountMeta::new(*swap_source, false),
        AccountMeta::new(*swap_destination, false),
        AccountMeta::new(*destination, false),
        AccountMeta::new_readonly(*pool.token_program_id, false),
    ];

    Instruction {
        program_id: *pool.program_id,
        accounts,
        data,
    }
}
