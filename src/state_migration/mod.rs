// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Offline migration of a legacy state, where the native currency lives in
//! the OVM ETH token contract, into a genesis state where every account
//! holds its balance natively.

mod error;
mod ovm_eth;

use std::path::Path;
use std::time::Duration;

pub use error::Error;
use ovm_eth::OvmEthBalances;

use crate::blocks::Block;
use crate::db::{DBStatistics as _, KeyValueStore, db_engine, rawdb};
use crate::genesis::{Genesis, GenesisAlloc};
use crate::state::{StateReader, StateWriter, storage_entries};
use crate::trie::EMPTY_ROOT_HASH;
use crate::utils::io::ProgressLog;
use anyhow::anyhow;
use ethereum_types::{Address, H256};
use humantime::format_duration;
use num_bigint::BigUint;
use num_traits::Zero as _;
use tracing::{debug, info};

/// Outcome of a successful migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationResult {
    pub state_root: H256,
    /// The sealed genesis block, committing to `state_root`.
    pub block: Block,
    /// Sum of the OVM ETH balances moved into native balances.
    pub total_carried: BigUint,
}

/// Migrates the state found in `<data_dir>/geth/chaindata` into a new
/// database at `out_dir`. A zero `state_root` selects the state of the
/// legacy head block.
pub fn migrate(
    data_dir: &Path,
    state_root: H256,
    genesis: &Genesis,
    out_dir: &Path,
    expected_supply: &BigUint,
    db_config: &db_engine::DbConfig,
) -> Result<MigrationResult, Error> {
    let input_path = db_engine::db_root(data_dir);
    let input = db_engine::open_db_read_only(&input_path, db_config)
        .map_err(|error| Error::io_open("input", &input_path, error))?;
    let output = db_engine::open_db(out_dir, db_config)
        .map_err(|error| Error::io_open("output", out_dir, error))?;
    info!(
        input = %input_path.display(),
        output = %out_dir.display(),
        "Opened databases"
    );
    let result = migrate_state(&input, &output, state_root, genesis, expected_supply)?;
    if let Some(stats) = output.get_statistics() {
        info!("Output database statistics:\n{stats}");
    }
    Ok(result)
}

/// Database agnostic core of [`migrate`].
pub fn migrate_state<In, Out>(
    input: &In,
    output: &Out,
    state_root: H256,
    genesis: &Genesis,
    expected_supply: &BigUint,
) -> Result<MigrationResult, Error>
where
    In: KeyValueStore,
    Out: KeyValueStore,
{
    let state_root = resolve_state_root(input, state_root)?;
    let reader = StateReader::open(input, state_root)?;
    let mut writer = StateWriter::new(output);

    apply_alloc(&mut writer, &genesis.alloc)?;
    let total_carried = migrate_accounts(&reader, &mut writer, &genesis.alloc)?;
    if total_carried != *expected_supply {
        return Err(Error::SupplyInvariant(format!(
            "carried {total_carried} OVM ETH, expected {expected_supply}"
        )));
    }

    info!("Committing state");
    let new_root = writer.commit().map_err(Error::commit)?;
    info!(root = ?new_root, "Committed state");
    verify_output(
        output,
        new_root,
        writer.len(),
        &genesis.alloc,
        expected_supply,
    )?;

    let block = genesis.to_block(new_root);
    write_genesis_block(output, genesis, &block).map_err(Error::commit)?;
    info!(
        hash = ?block.hash(),
        number = block.number(),
        root = ?new_root,
        "Wrote genesis block"
    );
    Ok(MigrationResult {
        state_root: new_root,
        block,
        total_carried,
    })
}

fn resolve_state_root(db: &impl KeyValueStore, state_root: H256) -> Result<H256, Error> {
    if !state_root.is_zero() {
        return Ok(state_root);
    }
    let hash = rawdb::read_head_block_hash(db)
        .map_err(Error::LegacyDb)?
        .ok_or(Error::MissingHead)?;
    let number = rawdb::read_header_number(db, &hash)
        .map_err(Error::LegacyDb)?
        .ok_or(Error::MissingHead)?;
    let header = rawdb::read_header(db, &hash, number)
        .map_err(Error::LegacyDb)?
        .ok_or(Error::MissingHead)?;
    info!(
        number,
        hash = ?hash,
        root = ?header.root,
        "Using the state root of the head block"
    );
    Ok(header.root)
}

/// Pre-allocated accounts go in first, so legacy accounts with the same
/// address can simply be skipped.
fn apply_alloc<DB: KeyValueStore>(
    writer: &mut StateWriter<'_, DB>,
    alloc: &GenesisAlloc,
) -> Result<(), Error> {
    info!(accounts = alloc.len(), "Importing allocated accounts");
    for (addr, account) in alloc {
        writer.add_balance(*addr, &account.balance);
        writer.set_code(*addr, account.code.clone());
        writer.set_nonce(*addr, account.nonce);
        for (key, value) in &account.storage {
            writer
                .set_storage(*addr, *key, *value)
                .map_err(Error::commit)?;
        }
        debug!(addr = ?addr, "Allocated account");
    }
    Ok(())
}

fn migrate_accounts<In, Out>(
    reader: &StateReader<'_, In>,
    writer: &mut StateWriter<'_, Out>,
    alloc: &GenesisAlloc,
) -> Result<BigUint, Error>
where
    In: KeyValueStore,
    Out: KeyValueStore,
{
    let balances = OvmEthBalances::open(reader)?;
    let mut total = BigUint::default();
    let mut progress = ProgressLog::new("Trie dumping");
    info!(root = ?reader.root(), "Trie dumping started");

    for item in reader.accounts() {
        let (addr, account) = item?;
        if alloc.contains_key(&addr) {
            info!(addr = ?addr, "Skipping preallocated account");
            continue;
        }
        if !account.balance.is_zero() {
            return Err(Error::SupplyInvariant(format!(
                "account {addr:#x} has a native balance of {}",
                account.balance
            )));
        }
        let code = reader.code(&account.code_hash)?;
        let balance = balances.balance_of(&addr)?;

        writer.add_balance(addr, &balance);
        writer.set_code(addr, code);
        writer.set_nonce(addr, account.nonce);
        migrate_storage(reader, writer, addr, account.storage_root)?;

        total += balance;
        progress.inc(1);
    }

    info!(
        accounts = progress.completed_items(),
        elapsed = %format_duration(Duration::from_secs(progress.elapsed().as_secs())),
        total_ovm_eth = %total,
        "Trie dumping complete"
    );
    Ok(total)
}

fn migrate_storage<In, Out>(
    reader: &StateReader<'_, In>,
    writer: &mut StateWriter<'_, Out>,
    addr: Address,
    storage_root: H256,
) -> Result<(), Error>
where
    In: KeyValueStore,
    Out: KeyValueStore,
{
    if storage_root == EMPTY_ROOT_HASH {
        return Ok(());
    }
    let storage = reader.storage_trie(storage_root)?;
    let mut progress = ProgressLog::new(&format!("Storage dumping of {addr:#x}"));
    for item in storage_entries(&storage) {
        let (key, value) = item?;
        writer.set_storage(addr, key, value).map_err(Error::commit)?;
        progress.inc(1);
    }
    Ok(())
}

/// Re-reads the committed state and checks it against what was written.
fn verify_output<DB: KeyValueStore>(
    db: &DB,
    root: H256,
    expected_accounts: usize,
    alloc: &GenesisAlloc,
    expected_supply: &BigUint,
) -> Result<(), Error> {
    let reader = StateReader::open(db, root).map_err(Error::commit)?;
    let mut accounts = 0usize;
    let mut supply = BigUint::default();
    for item in reader.accounts() {
        let (addr, account) = item.map_err(Error::commit)?;
        accounts += 1;
        if !alloc.contains_key(&addr) {
            supply += account.balance;
        }
    }
    if accounts != expected_accounts {
        return Err(Error::Commit(anyhow!(
            "output state holds {accounts} accounts, {expected_accounts} were written"
        )));
    }
    if supply != *expected_supply {
        return Err(Error::Commit(anyhow!(
            "output state carries {supply} OVM ETH, expected {expected_supply}"
        )));
    }
    info!(accounts, "Verified output state");
    Ok(())
}

fn write_genesis_block(
    db: &impl KeyValueStore,
    genesis: &Genesis,
    block: &Block,
) -> anyhow::Result<()> {
    let hash = block.hash();
    let number = block.number();
    rawdb::write_genesis_state(db, &hash, genesis)?;
    rawdb::write_td(db, &hash, number, &block.header().difficulty)?;
    rawdb::write_block(db, block)?;
    rawdb::write_receipts(db, &hash, number, &[])?;
    rawdb::write_canonical_hash(db, &hash, number)?;
    rawdb::write_head_block_hash(db, &hash)?;
    rawdb::write_head_fast_block_hash(db, &hash)?;
    rawdb::write_head_header_hash(db, &hash)?;
    rawdb::write_chain_config(db, &hash, &genesis.config)?;
    Ok(())
}
