//! Persisted program addresses
//!
//! A JSON object mapping a program name to its deployed address, e.g.
//! `{ "stableSwap": "5MfGb..." }`. Bootstrap reads it to reuse a deployed
//! program and records new deployments in it.

use crate::error::{Error, Result};
use solana_sdk::pubkey::Pubkey;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramFixture {
    programs: BTreeMap<String, String>,
}

impl ProgramFixture {
    /// Load the fixture at `path`; a missing file is an empty fixture.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No program fixture at {}", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(Self {
            programs: serde_json::from_str(&contents)?,
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.programs)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Option<Pubkey>> {
        self.programs
            .get(name)
            .map(|address| {
                Pubkey::from_str(address).map_err(|e| {
                    Error::Decode(format!("fixture address for {}: {}: {}", name, address, e))
                })
            })
            .transpose()
    }

    pub fn insert(&mut self, name: &str, address: &Pubkey) {
        self.programs.insert(name.to_string(), address.to_string());
    }
}
