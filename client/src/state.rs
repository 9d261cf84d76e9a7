//! Stable swap state account layout
//!
//! Layout (218 bytes):
//! - is_initialized: u8
//! - nonce: u8
//! - amp_factor, fee_numerator, fee_denominator: u64 LE each
//! - token_program_id, token_account_a, token_account_b, pool_mint,
//!   mint_a, mint_b: 32 bytes each

use crate::error::{Error, Result};
use solana_sdk::pubkey::Pubkey;

const PUBKEY_LEN: usize = 32;

/// Decoded pool configuration. Immutable once the pool is initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StableSwapState {
    pub nonce: u8,
    pub amp_factor: u64,
    pub fee_numerator: u64,
    pub fee_denominator: u64,
    pub token_program_id: Pubkey,
    pub token_account_a: Pubkey,
    pub token_account_b: Pubkey,
    pub pool_mint: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
}

impl StableSwapState {
    pub const LEN: usize = 2 + 3 * 8 + 6 * PUBKEY_LEN;

    pub fn unpack(data: &[u8]) -> Result<Self> {
        if data.len() != Self::LEN {
            return Err(Error::Decode(format!(
                "stable swap state is {} bytes, expected {}",
                data.len(),
                Self::LEN
            )));
        }

        let mut reader = Reader { data, offset: 0 };
        match reader.u8() {
            1 => {}
            0 => return Err(Error::Decode("stable swap state is not initialized".to_string())),
            flag => {
                return Err(Error::Decode(format!(
                    "invalid is_initialized flag {}",
                    flag
                )))
            }
        }

        let state = Self {
            nonce: reader.u8(),
            amp_factor: reader.u64(),
            fee_numerator: reader.u64(),
            fee_denominator: reader.u64(),
            token_program_id: reader.pubkey(),
            token_account_a: reader.pubkey(),
            token_account_b: reader.pubkey(),
            pool_mint: reader.pubkey(),
            mint_a: reader.pubkey(),
            mint_b: reader.pubkey(),
        };

        if state.fee_denominator == 0 {
            return Err(Error::Decode("fee denominator is zero".to_string()));
        }

        Ok(state)
    }

    pub fn pack(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(Self::LEN);
        data.push(1);
        data.push(self.nonce);
        data.extend_from_slice(&self.amp_factor.to_le_bytes());
        data.extend_from_slice(&self.fee_numerator.to_le_bytes());
        data.extend_from_slice(&self.fee_denominator.to_le_bytes());
        for key in [
            &self.token_program_id,
            &self.token_account_a,
            &self.token_account_b,
            &self.pool_mint,
            &self.mint_a,
            &self.mint_b,
        ] {
            data.extend_from_slice(key.as_ref());
        }
        data
    }
}

/// Cursor over a buffer whose length was checked up front
struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl Reader<'_> {
    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.offset..self.offset + N]);
        self.offset += N;
        out
    }

    fn u8(&mut self) -> u8 {
        self.take::<1>()[0]
    }

    fn u64(&mut self) -> u64 {
        u64::from_le_bytes(self.take())
    }

    fn pubkey(&mut self) -> Pubkey {
        Pubkey::new_from_array(self.take())
    }
}
