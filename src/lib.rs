// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Offline state surgery: rewrites a legacy OVM ETH state into a genesis
//! state with native balances, and seals the genesis block over it.

mod blocks;
mod cli_shared;
mod db;
mod genesis;
mod state;
mod state_migration;
mod tool;
mod trie;
mod txmgr;
mod utils;

pub use cli_shared::cli::{Config, LogConfig};
pub use genesis::{Genesis, GenesisAccount, GenesisAlloc, read_genesis, read_genesis_from_file};
pub use state_migration::{Error as MigrationError, MigrationResult, migrate};
pub use tool::main::main as state_surgery_main;
pub use txmgr::{SendError, SendState};
