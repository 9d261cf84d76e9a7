//! Fungible-token program helpers

use crate::connection::Connection;
use crate::error::{Error, Result};
use crate::submitter::TransactionSubmitter;
use solana_sdk::{
    program_pack::Pack,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    system_instruction,
    transaction::Transaction,
};
use spl_token::state::{Account as TokenAccount, Mint};

/// Create and initialize a new mint; returns its address.
pub async fn create_mint<C: Connection + ?Sized>(
    conn: &C,
    submitter: &TransactionSubmitter,
    payer: &Keypair,
    mint_authority: &Pubkey,
    decimals: u8,
    token_program_id: &Pubkey,
) -> Result<Pubkey> {
    let mint = Keypair::new();
    let rent = conn.get_minimum_balance_for_rent_exemption(Mint::LEN).await?;

    let instructions = [
        system_instruction::create_account(
            &payer.pubkey(),
            &mint.pubkey(),
            rent,
            Mint::LEN as u64,
            token_program_id,
        ),
        spl_token::instruction::initialize_mint(
            token_program_id,
            &mint.pubkey(),
            mint_authority,
            None,
            decimals,
        )?,
    ];

    let transaction = Transaction::new_with_payer(&instructions, Some(&payer.pubkey()));
    submitter
        .submit("create mint", conn, transaction, &[payer, &mint])
        .await?;
    Ok(mint.pubkey())
}

/// Create a token account for `mint` owned by `owner`; returns its address.
pub async fn create_account<C: Connection + ?Sized>(
    conn: &C,
    submitter: &TransactionSubmitter,
    payer: &Keypair,
    mint: &Pubkey,
    owner: &Pubkey,
    token_program_id: &Pubkey,
) -> Result<Pubkey> {
    let account = Keypair::new();
    let rent = conn
        .get_minimum_balance_for_rent_exemption(TokenAccount::LEN)
        .await?;

    let instructions = [
        system_instruction::create_account(
            &payer.pubkey(),
            &account.pubkey(),
            rent,
            TokenAccount::LEN as u64,
            token_program_id,
        ),
        spl_token::instruction::initialize_account(
            token_program_id,
            &account.pubkey(),
            mint,
            owner,
        )?,
    ];

    let transaction = Transaction::new_with_payer(&instructions, Some(&payer.pubkey()));
    submitter
        .submit("create token account", conn, transaction, &[payer, &account])
        .await?;
    Ok(account.pubkey())
}

/// Mint `amount` of `mint` into `destination`, signed by the mint authority.
#[allow(clippy::too_many_arguments)]
pub async fn mint_to<C: Connection + ?Sized>(
    conn: &C,
    submitter: &TransactionSubmitter,
    payer: &Keypair,
    mint: &Pubkey,
    destination: &Pubkey,
    mint_authority: &Keypair,
    amount: u64,
    token_program_id: &Pubkey,
) -> Result<Signature> {
    let instruction = spl_token::instruction::mint_to(
        token_program_id,
        mint,
        destination,
        &mint_authority.pubkey(),
        &[],
        amount,
    )?;

    let transaction = Transaction::new_with_payer(&[instruction], Some(&payer.pubkey()));
    submitter
        .submit("mint to", conn, transaction, &[payer, mint_authority])
        .await
}

/// Token balance of `account`; only the amount field is decoded.
pub async fn token_balance<C: Connection + ?Sized>(conn: &C, account: &Pubkey) -> Result<u64> {
    let info = conn
        .get_account(account)
        .await?
        .ok_or(Error::AccountNotFound(*account))?;
    let state = TokenAccount::unpack(&info.data)
        .map_err(|e| Error::Decode(format!("token account {}: {}", account, e)))?;
    Ok(state.amount)
}
