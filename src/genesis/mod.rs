// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Genesis files in the JSON layout shared by Ethereum execution clients.

pub mod json;

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::blocks::{Block, Header};
use anyhow::Context as _;
use ethereum_types::{Address, H64, H256};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Gas limit of a genesis block that does not set one.
pub const GENESIS_GAS_LIMIT: u64 = 4_712_388;
/// Difficulty of a genesis block that sets neither difficulty nor mix hash.
pub const GENESIS_DIFFICULTY: u64 = 131_072;
/// Base fee of a genesis block with London active from block zero.
pub const INITIAL_BASE_FEE: u64 = 1_000_000_000;

/// Pre-allocated accounts, ordered by address.
pub type GenesisAlloc = BTreeMap<Address, GenesisAccount>;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisAccount {
    #[serde(
        default,
        with = "json::hex_bytes",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub code: Vec<u8>,
    #[serde(
        default,
        with = "json::storage",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub storage: BTreeMap<H256, H256>,
    #[serde(with = "json::big_quantity")]
    pub balance: BigUint,
    #[serde(default, with = "json::quantity")]
    pub nonce: u64,
}

/// Chain configuration. Only the fields needed to seal the genesis block
/// are typed; everything else is carried through unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub london_block: Option<u64>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl ChainConfig {
    pub fn is_london(&self, number: u64) -> bool {
        self.london_block.is_some_and(|fork| fork <= number)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Genesis {
    #[serde(default)]
    pub config: ChainConfig,
    #[serde(default, with = "json::quantity")]
    pub nonce: u64,
    #[serde(default, with = "json::quantity")]
    pub timestamp: u64,
    #[serde(default, with = "json::hex_bytes")]
    pub extra_data: Vec<u8>,
    #[serde(default, with = "json::quantity")]
    pub gas_limit: u64,
    #[serde(
        default,
        with = "json::opt_big_quantity",
        skip_serializing_if = "Option::is_none"
    )]
    pub difficulty: Option<BigUint>,
    #[serde(default)]
    pub mix_hash: H256,
    #[serde(default)]
    pub coinbase: Address,
    #[serde(default, with = "json::alloc")]
    pub alloc: GenesisAlloc,
    #[serde(default, with = "json::quantity")]
    pub number: u64,
    #[serde(default, with = "json::quantity")]
    pub gas_used: u64,
    #[serde(default)]
    pub parent_hash: H256,
    #[serde(
        default,
        with = "json::opt_big_quantity",
        skip_serializing_if = "Option::is_none"
    )]
    pub base_fee_per_gas: Option<BigUint>,
}

impl Genesis {
    /// Header template of the genesis block.
    pub fn to_header(&self, root: H256) -> Header {
        let difficulty = match &self.difficulty {
            Some(difficulty) => difficulty.clone(),
            None if self.mix_hash.is_zero() => BigUint::from(GENESIS_DIFFICULTY),
            None => BigUint::default(),
        };
        let base_fee = if self.config.is_london(0) {
            Some(
                self.base_fee_per_gas
                    .clone()
                    .unwrap_or_else(|| BigUint::from(INITIAL_BASE_FEE)),
            )
        } else {
            None
        };
        Header {
            parent_hash: self.parent_hash,
            coinbase: self.coinbase,
            root,
            difficulty,
            number: self.number,
            gas_limit: if self.gas_limit == 0 {
                GENESIS_GAS_LIMIT
            } else {
                self.gas_limit
            },
            gas_used: self.gas_used,
            time: self.timestamp,
            extra: self.extra_data.clone(),
            mix_digest: self.mix_hash,
            nonce: H64(self.nonce.to_be_bytes()),
            base_fee,
            ..Default::default()
        }
    }

    /// Seals the genesis block over the given state root.
    pub fn to_block(&self, root: H256) -> Block {
        Block::new(self.to_header(root))
    }
}

pub fn read_genesis(reader: impl Read) -> anyhow::Result<Genesis> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn read_genesis_from_file(path: &Path) -> anyhow::Result<Genesis> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("cannot open genesis file {}", path.display()))?;
    let genesis = read_genesis(std::io::BufReader::new(file))
        .with_context(|| format!("cannot parse genesis file {}", path.display()))?;
    debug!(
        path = %path.display(),
        allocs = genesis.alloc.len(),
        "Loaded genesis"
    );
    Ok(genesis)
}
