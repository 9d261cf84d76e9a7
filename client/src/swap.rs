//! Stable swap client
//!
//! A `StableSwap` only exists once its state account is known: it is
//! obtained either by creating a new pool (`create`) or by loading an
//! existing one (`load`). Every transaction goes through the
//! `TransactionSubmitter` it was built with.

use crate::address::ProgramDerivedAddress;
use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::instruction::{self, PoolAccounts};
use crate::state::StableSwapState;
use crate::submitter::TransactionSubmitter;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    system_instruction,
    transaction::Transaction,
};

/// `SystemError::AccountAlreadyInUse` raised by `create_account`
const ACCOUNT_ALREADY_IN_USE: u32 = 0;

/// Pool configuration supplied when creating a stable swap
#[derive(Debug, Clone, Copy)]
pub struct NewStableSwap {
    /// Reserve of token A, owned by the pool authority
    pub token_account_a: Pubkey,
    /// Reserve of token B, owned by the pool authority
    pub token_account_b: Pubkey,
    /// Pool token mint; its mint authority must be the pool authority
    pub pool_mint: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    /// Receives the initial pool tokens
    pub pool_token_account: Pubkey,
    pub token_program_id: Pubkey,
    pub amp_factor: u64,
    pub fee_numerator: u64,
    pub fee_denominator: u64,
}

/// Which reserve receives the input of a swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDirection {
    AToB,
    BToA,
}

pub struct StableSwap<'a, C: ?Sized> {
    conn: &'a C,
    submitter: TransactionSubmitter,
    payer: &'a Keypair,
    address: Pubkey,
    program_id: Pubkey,
    authority: ProgramDerivedAddress,
    state: StableSwapState,
}

impl<'a, C: Connection + ?Sized> StableSwap<'a, C> {
    /// Create the state account and initialize the pool in one transaction.
    ///
    /// `authority` must be derived from `state_account`'s address under the
    /// stable swap program; its nonce is stored in the pool state.
    pub async fn create(
        conn: &'a C,
        submitter: TransactionSubmitter,
        payer: &'a Keypair,
        state_account: &Keypair,
        authority: &ProgramDerivedAddress,
        params: NewStableSwap,
    ) -> Result<Self> {
        let address = state_account.pubkey();
        let program_id = authority.program_id();

        let expected =
            ProgramDerivedAddress::with_nonce(&[address.as_ref()], authority.nonce(), &program_id)?;
        if expected != *authority {
            return Err(Error::AuthorityMismatch {
                authority: authority.address(),
                swap: address,
            });
        }

        if conn.get_account(&address).await?.is_some() {
            return Err(Error::AlreadyInitialized(address));
        }

        let rent = conn
            .get_minimum_balance_for_rent_exemption(StableSwapState::LEN)
            .await?;

        let pool = PoolAccounts {
            program_id: &program_id,
            token_program_id: &params.token_program_id,
            swap: &address,
            authority: authority.as_ref(),
        };
        let instructions = [
            system_instruction::create_account(
                &payer.pubkey(),
                &address,
                rent,
                StableSwapState::LEN as u64,
                &program_id,
            ),
            instruction::initialize(
                pool,
                &params.mint_a,
                &params.token_account_a,
                &params.mint_b,
                &params.token_account_b,
                &params.pool_mint,
                &params.pool_token_account,
                authority.nonce(),
                params.amp_factor,
                params.fee_numerator,
                params.fee_denominator,
            ),
        ];

        let transaction = Transaction::new_with_payer(&instructions, Some(&payer.pubkey()));
        submitter
            .submit("initialize stable swap", conn, transaction, &[payer, state_account])
            .await
            .map_err(|e| match e.custom_program_error(0) {
                // System program: the state account already exists
                Some(ACCOUNT_ALREADY_IN_USE) => Error::AlreadyInitialized(address),
                _ => e.relay_swap_error(address, 1),
            })?;

        log::info!("Stable swap initialized at {}", address);

        Ok(Self {
            conn,
            submitter,
            payer,
            address,
            program_id,
            authority: *authority,
            state: StableSwapState {
                nonce: authority.nonce(),
                amp_factor: params.amp_factor,
                fee_numerator: params.fee_numerator,
                fee_denominator: params.fee_denominator,
                token_program_id: params.token_program_id,
                token_account_a: params.token_account_a,
                token_account_b: params.token_account_b,
                pool_mint: params.pool_mint,
                mint_a: params.mint_a,
                mint_b: params.mint_b,
            },
        })
    }

    /// Fetch and decode an existing pool.
    pub async fn load(
        conn: &'a C,
        submitter: TransactionSubmitter,
        address: &Pubkey,
        program_id: &Pubkey,
        payer: &'a Keypair,
    ) -> Result<Self> {
        let account = conn
            .get_account(address)
            .await?
            .ok_or(Error::AccountNotFound(*address))?;

        if account.owner != *program_id {
            return Err(Error::Decode(format!(
                "account {} is owned by {}, expected {}",
                address, account.owner, program_id
            )));
        }

        let state = StableSwapState::unpack(&account.data)?;
        let authority =
            ProgramDerivedAddress::with_nonce(&[address.as_ref()], state.nonce, program_id)?;

        Ok(Self {
            conn,
            submitter,
            payer,
            address: *address,
            program_id: *program_id,
            authority,
            state,
        })
    }

    pub(crate) fn bound(
        conn: &'a C,
        submitter: TransactionSubmitter,
        payer: &'a Keypair,
        address: Pubkey,
        authority: ProgramDerivedAddress,
        state: StableSwapState,
    ) -> Self {
        Self {
            conn,
            submitter,
            payer,
            address,
            program_id: authority.program_id(),
            authority,
            state,
        }
    }

    /// Approve the pool authority on both sources and deposit.
    ///
    /// The program mints at least `minimum_pool_tokens_out` pool tokens into
    /// `destination_pool_account` or fails the whole transaction, which is
    /// reported as `SlippageExceeded`.
    #[allow(clippy::too_many_arguments)]
    pub async fn deposit(
        &self,
        owner: &Keypair,
        user_account_a: &Pubkey,
        user_account_b: &Pubkey,
        destination_pool_account: &Pubkey,
        amount_a: u64,
        amount_b: u64,
        minimum_pool_tokens_out: u64,
    ) -> Result<Signature> {
        let instructions = [
            self.approve(user_account_a, owner, amount_a)?,
            self.approve(user_account_b, owner, amount_b)?,
            instruction::deposit(
                self.pool(),
                user_account_a,
                user_account_b,
                &self.state.token_account_a,
                &self.state.token_account_b,
                &self.state.pool_mint,
                destination_pool_account,
                amount_a,
                amount_b,
                minimum_pool_tokens_out,
            ),
        ];
        self.submit("deposit", &instructions, owner).await
    }

    /// Approve the pool authority on the pool tokens and withdraw both sides.
    #[allow(clippy::too_many_arguments)]
    pub async fn withdraw(
        &self,
        owner: &Keypair,
        source_pool_account: &Pubkey,
        destination_a: &Pubkey,
        destination_b: &Pubkey,
        pool_token_amount: u64,
        minimum_token_a_amount: u64,
        minimum_token_b_amount: u64,
    ) -> Result<Signature> {
        let instructions = [
            self.approve(source_pool_account, owner, pool_token_amount)?,
            instruction::withdraw(
                self.pool(),
                &self.state.pool_mint,
                source_pool_account,
                &self.state.token_account_a,
                &self.state.token_account_b,
                destination_a,
                destination_b,
                pool_token_amount,
                minimum_token_a_amount,
                minimum_token_b_amount,
            ),
        ];
        self.submit("withdraw", &instructions, owner).await
    }

    /// Approve the pool authority on `user_source` and swap into `user_destination`.
    pub async fn swap(
        &self,
        owner: &Keypair,
        direction: SwapDirection,
        user_source: &Pubkey,
        user_destination: &Pubkey,
        amount_in: u64,
        minimum_amount_out: u64,
    ) -> Result<Signature> {
        let (swap_source, swap_destination) = match direction {
            SwapDirection::AToB => (&self.state.token_account_a, &self.state.token_account_b),
            SwapDirection::BToA => (&self.state.token_account_b, &self.state.token_account_a),
        };
        let instructions = [
            self.approve(user_source, owner, amount_in)?,
            instruction::swap(
                self.pool(),
                user_source,
                swap_source,
                swap_destination,
                user_destination,
                amount_in,
                minimum_amount_out,
            ),
        ];
        self.submit("swap", &instructions, owner).await
    }

    fn pool(&self) -> PoolAccounts<'_> {
        PoolAccounts {
            program_id: &self.program_id,
            token_program_id: &self.state.token_program_id,
            swap: &self.address,
            authority: self.authority.as_ref(),
        }
    }

    fn approve(&self, source: &Pubkey, owner: &Keypair, amount: u64) -> Result<Instruction> {
        Ok(spl_token::instruction::approve(
            &self.state.token_program_id,
            source,
            self.authority.as_ref(),
            &owner.pubkey(),
            &[],
            amount,
        )?)
    }

    /// Submit `instructions`; the stable swap instruction must come last.
    async fn submit(
        &self,
        label: &str,
        instructions: &[Instruction],
        owner: &Keypair,
    ) -> Result<Signature> {
        let swap_index = (instructions.len() - 1) as u8;
        let transaction = Transaction::new_with_payer(instructions, Some(&self.payer.pubkey()));
        self.submitter
            .submit(label, self.conn, transaction, &[self.payer, owner])
            .await
            .map_err(|e| e.relay_swap_error(self.address, swap_index))
    }

    pub fn address(&self) -> Pubkey {
        self.address
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    pub fn authority(&self) -> &ProgramDerivedAddress {
        &self.authority
    }

    pub fn state(&self) -> &StableSwapState {
        &self.state
    }

    pub fn token_account_a(&self) -> Pubkey {
        self.state.token_account_a
    }

    pub fn token_account_b(&self) -> Pubkey {
        self.state.token_account_b
    }

    pub fn pool_mint(&self) -> Pubkey {
        self.state.pool_mint
    }

    pub fn mint_a(&self) -> Pubkey {
        self.state.mint_a
    }

    pub fn mint_b(&self) -> Pubkey {
        self.state.mint_b
    }

    pub fn token_program_id(&self) -> Pubkey {
        self.state.token_program_id
    }

    pub fn amp_factor(&self) -> u64 {
        self.state.amp_factor
    }

    pub fn fee_numerator(&self) -> u64 {
        self.state.fee_numerator
    }

    pub fn fee_denominator(&self) -> u64 {
        self.state.fee_denominator
    }
}
