// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::PathBuf;

use crate::cli_shared::cli::Config;
use crate::genesis::read_genesis_from_file;
use crate::state_migration::migrate;
use crate::utils::misc::LoggingColor;
use anyhow::{Context as _, ensure};
use clap::Parser;
use ethereum_types::H256;
use num_bigint::BigUint;
use tracing::info;

/// Command-line options for the `state-surgery` binary
#[derive(Debug, Parser)]
#[command(
    name = "state-surgery",
    author = env!("CARGO_PKG_AUTHORS"),
    version,
    about = env!("CARGO_PKG_DESCRIPTION")
)]
pub struct Cli {
    /// Data directory of the legacy node. The chain database is read from
    /// `<DATA_DIR>/geth/chaindata`.
    #[arg(short = 'd', long)]
    pub data_dir: PathBuf,
    /// State root to migrate. Defaults to the state of the head block when
    /// unset or empty.
    #[arg(short = 'r', long)]
    pub state_root: Option<String>,
    /// Genesis file of the new chain
    #[arg(short = 'g', long)]
    pub genesis_file: PathBuf,
    /// Directory to write the new chain database to
    #[arg(short = 'o', long)]
    pub out_dir: PathBuf,
    /// Expected sum of all OVM ETH balances, in wei
    #[arg(short = 'e', long)]
    pub expected_total_supply: String,
    /// Optional TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Enable or disable colored logging
    #[arg(long, default_value = "auto")]
    pub color: LoggingColor,
}

impl Cli {
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let expected_supply = parse_total_supply(&self.expected_total_supply)?;
        let state_root = state_root_arg(self.state_root.as_deref())?;
        let genesis = read_genesis_from_file(&self.genesis_file)?;
        info!(
            data_dir = %self.data_dir.display(),
            out_dir = %self.out_dir.display(),
            state_root = ?state_root,
            expected_supply = %expected_supply,
            "Starting state surgery"
        );

        let result = migrate(
            &self.data_dir,
            state_root,
            &genesis,
            &self.out_dir,
            &expected_supply,
            &config.db,
        )?;
        info!(
            root = ?result.state_root,
            hash = ?result.block.hash(),
            total_carried = %result.total_carried,
            "State surgery complete"
        );
        Ok(())
    }
}

/// Parses a decimal wei amount.
fn parse_total_supply(s: &str) -> anyhow::Result<BigUint> {
    BigUint::parse_bytes(s.trim().as_bytes(), 10)
        .with_context(|| format!("invalid total supply {s:?}"))
}

/// A missing or empty root selects the zero hash, which the migration
/// resolves to the state of the head block.
fn state_root_arg(s: Option<&str>) -> anyhow::Result<H256> {
    match s.map(str::trim) {
        Some(root) if !root.is_empty() => parse_state_root(root),
        _ => Ok(H256::zero()),
    }
}

/// Parses a 32 byte hex hash, with or without a `0x` prefix.
fn parse_state_root(s: &str) -> anyhow::Result<H256> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(digits).with_context(|| format!("invalid state root {s:?}"))?;
    ensure!(
        bytes.len() == H256::len_bytes(),
        "invalid state root {s:?}: expected 32 bytes, got {}",
        bytes.len()
    );
    Ok(H256::from_slice(&bytes))
}
