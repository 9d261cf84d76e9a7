//! Program-derived addresses
//!
//! A `ProgramDerivedAddress` has no private key. It deliberately does not
//! implement `Signer`, and every API that signs takes a `Keypair`, so a
//! derived address can never be passed where a signature is required.

use crate::error::{Error, Result};
use solana_sdk::pubkey::Pubkey;

/// Address derived from seeds, a nonce and the owning program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramDerivedAddress {
    address: Pubkey,
    nonce: u8,
    program_id: Pubkey,
}

impl ProgramDerivedAddress {
    /// Find the smallest nonce for which `seeds + [nonce]` derives an
    /// off-curve address under `program_id`.
    pub fn derive(seeds: &[&[u8]], program_id: &Pubkey) -> Result<Self> {
        (u8::MIN..=u8::MAX)
            .find_map(|nonce| Self::with_nonce(seeds, nonce, program_id).ok())
            .ok_or(Error::NoValidNonce {
                program_id: *program_id,
            })
    }

    /// Re-derive from a stored nonce, as the on-chain program does.
    pub fn with_nonce(seeds: &[&[u8]], nonce: u8, program_id: &Pubkey) -> Result<Self> {
        let nonce_seed = [nonce];
        let mut full_seeds = seeds.to_vec();
        full_seeds.push(&nonce_seed);

        let address = Pubkey::create_program_address(&full_seeds, program_id).map_err(|e| {
            Error::Decode(format!(
                "nonce {} does not derive a program address for {}: {}",
                nonce, program_id, e
            ))
        })?;

        Ok(Self {
            address,
            nonce,
            program_id: *program_id,
        })
    }

    /// Authority of a stable swap pool: derived from the swap state address.
    pub fn swap_authority(swap: &Pubkey, program_id: &Pubkey) -> Result<Self> {
        Self::derive(&[swap.as_ref()], program_id)
    }

    pub fn address(&self) -> Pubkey {
        self.address
    }

    pub fn nonce(&self) -> u8 {
        self.nonce
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }
}

impl AsRef<Pubkey> for ProgramDerivedAddress {
    fn as_ref(&self) -> &Pubkey {
        &self.address
    }
}
