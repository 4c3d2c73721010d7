// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Typed accessors over the raw rows described in [`schema`].

pub mod schema;

use crate::blocks::{Block, Header};
use crate::db::{KeyValueStore, KeyValueStoreExt as _};
use crate::genesis::{ChainConfig, Genesis};
use crate::utils::encoding::append_biguint;
use anyhow::{Context as _, bail};
use ethereum_types::H256;
use num_bigint::BigUint;
use rlp::RlpStream;

fn read_hash(db: &impl KeyValueStore, key: &[u8]) -> anyhow::Result<Option<H256>> {
    match db.read_bin(key)? {
        Some(bytes) if bytes.len() == 32 => Ok(Some(H256::from_slice(&bytes))),
        Some(bytes) => bail!(
            "row {} holds {} bytes, expected a 32 byte hash",
            String::from_utf8_lossy(key),
            bytes.len()
        ),
        None => Ok(None),
    }
}

pub fn read_head_block_hash(db: &impl KeyValueStore) -> anyhow::Result<Option<H256>> {
    read_hash(db, schema::HEAD_BLOCK_KEY)
}

pub fn write_head_block_hash(db: &impl KeyValueStore, hash: &H256) -> anyhow::Result<()> {
    db.write_bin(schema::HEAD_BLOCK_KEY, hash.as_bytes())
}

#[cfg(test)]
pub fn read_head_header_hash(db: &impl KeyValueStore) -> anyhow::Result<Option<H256>> {
    read_hash(db, schema::HEAD_HEADER_KEY)
}

pub fn write_head_header_hash(db: &impl KeyValueStore, hash: &H256) -> anyhow::Result<()> {
    db.write_bin(schema::HEAD_HEADER_KEY, hash.as_bytes())
}

#[cfg(test)]
pub fn read_head_fast_block_hash(db: &impl KeyValueStore) -> anyhow::Result<Option<H256>> {
    read_hash(db, schema::HEAD_FAST_BLOCK_KEY)
}

pub fn write_head_fast_block_hash(db: &impl KeyValueStore, hash: &H256) -> anyhow::Result<()> {
    db.write_bin(schema::HEAD_FAST_BLOCK_KEY, hash.as_bytes())
}

/// Looks up the block number assigned to a header hash.
pub fn read_header_number(db: &impl KeyValueStore, hash: &H256) -> anyhow::Result<Option<u64>> {
    let Some(bytes) = db.read_bin(&schema::header_number_key(hash))? else {
        return Ok(None);
    };
    let raw: [u8; 8] = bytes
        .as_slice()
        .try_into()
        .with_context(|| format!("malformed number row for header {hash:#x}"))?;
    Ok(Some(u64::from_be_bytes(raw)))
}

pub fn read_header(
    db: &impl KeyValueStore,
    hash: &H256,
    number: u64,
) -> anyhow::Result<Option<Header>> {
    match db.read_bin(&schema::header_key(number, hash))? {
        Some(bytes) => Ok(Some(
            rlp::decode(&bytes).with_context(|| format!("malformed header {hash:#x}"))?,
        )),
        None => Ok(None),
    }
}

/// Stores the header together with its hash to number mapping.
pub fn write_header(db: &impl KeyValueStore, header: &Header) -> anyhow::Result<()> {
    let hash = header.hash();
    db.write_batch([
        (
            schema::header_number_key(&hash),
            header.number.to_be_bytes().to_vec(),
        ),
        (
            schema::header_key(header.number, &hash),
            rlp::encode(header).to_vec(),
        ),
    ])
}

/// Resolves `LastBlock` to its header.
#[cfg(test)]
pub fn read_head_header(db: &impl KeyValueStore) -> anyhow::Result<Option<Header>> {
    let Some(hash) = read_head_block_hash(db)? else {
        return Ok(None);
    };
    let number = read_header_number(db, &hash)?
        .with_context(|| format!("head block {hash:#x} has no number row"))?;
    read_header(db, &hash, number)?
        .with_context(|| format!("head block {hash:#x} has no header row"))
        .map(Some)
}

#[cfg(test)]
pub fn read_body_rlp(
    db: &impl KeyValueStore,
    hash: &H256,
    number: u64,
) -> anyhow::Result<Option<Vec<u8>>> {
    db.read_bin(&schema::block_body_key(number, hash))
}

pub fn write_body_rlp(
    db: &impl KeyValueStore,
    hash: &H256,
    number: u64,
    body: &[u8],
) -> anyhow::Result<()> {
    db.write_bin(&schema::block_body_key(number, hash), body)
}

/// Stores the block body and header.
pub fn write_block(db: &impl KeyValueStore, block: &Block) -> anyhow::Result<()> {
    write_body_rlp(db, &block.hash(), block.number(), &block.body_rlp())?;
    write_header(db, block.header())
}

#[cfg(test)]
pub fn read_td(
    db: &impl KeyValueStore,
    hash: &H256,
    number: u64,
) -> anyhow::Result<Option<BigUint>> {
    use crate::utils::encoding::decode_biguint;
    use rlp::Rlp;

    let Some(bytes) = db.read_bin(&schema::header_td_key(number, hash))? else {
        return Ok(None);
    };
    Ok(Some(decode_biguint(&Rlp::new(&bytes))?))
}

pub fn write_td(
    db: &impl KeyValueStore,
    hash: &H256,
    number: u64,
    td: &BigUint,
) -> anyhow::Result<()> {
    let mut s = RlpStream::new();
    append_biguint(&mut s, td);
    db.write_bin(&schema::header_td_key(number, hash), &s.out())
}

/// Stores the receipts of a block. Each entry is an already encoded receipt.
pub fn write_receipts(
    db: &impl KeyValueStore,
    hash: &H256,
    number: u64,
    receipts: &[Vec<u8>],
) -> anyhow::Result<()> {
    let mut s = RlpStream::new_list(receipts.len());
    for receipt in receipts {
        s.append_raw(receipt, 1);
    }
    db.write_bin(&schema::block_receipts_key(number, hash), &s.out())
}

#[cfg(test)]
pub fn read_receipts_rlp(
    db: &impl KeyValueStore,
    hash: &H256,
    number: u64,
) -> anyhow::Result<Option<Vec<u8>>> {
    db.read_bin(&schema::block_receipts_key(number, hash))
}

#[cfg(test)]
pub fn read_canonical_hash(db: &impl KeyValueStore, number: u64) -> anyhow::Result<Option<H256>> {
    read_hash(db, &schema::header_hash_key(number))
}

pub fn write_canonical_hash(
    db: &impl KeyValueStore,
    hash: &H256,
    number: u64,
) -> anyhow::Result<()> {
    db.write_bin(&schema::header_hash_key(number), hash.as_bytes())
}

/// Reads contract code, falling back to the legacy layout keyed by the bare
/// code hash.
pub fn read_code(db: &impl KeyValueStore, hash: &H256) -> anyhow::Result<Option<Vec<u8>>> {
    if let Some(code) = db.read_bin(&schema::code_key(hash))? {
        return Ok(Some(code));
    }
    db.read_bin(hash.as_bytes())
}

pub fn write_code(db: &impl KeyValueStore, hash: &H256, code: &[u8]) -> anyhow::Result<()> {
    db.write_bin(&schema::code_key(hash), code)
}

pub fn read_preimage(db: &impl KeyValueStore, hash: &H256) -> anyhow::Result<Option<Vec<u8>>> {
    db.read_bin(&schema::preimage_key(hash))
}

pub fn write_preimages<'a>(
    db: &impl KeyValueStore,
    preimages: impl IntoIterator<Item = (&'a H256, &'a Vec<u8>)>,
) -> anyhow::Result<()> {
    db.write_batch(
        preimages
            .into_iter()
            .map(|(hash, preimage)| (schema::preimage_key(hash), preimage)),
    )
}

#[cfg(test)]
pub fn read_chain_config(
    db: &impl KeyValueStore,
    genesis_hash: &H256,
) -> anyhow::Result<Option<ChainConfig>> {
    db.read_obj(&schema::config_key(genesis_hash))
}

pub fn write_chain_config(
    db: &impl KeyValueStore,
    genesis_hash: &H256,
    config: &ChainConfig,
) -> anyhow::Result<()> {
    db.write_obj(&schema::config_key(genesis_hash), config)
}

/// The genesis file the block was sealed from, as JSON.
#[cfg(test)]
pub fn read_genesis_state(
    db: &impl KeyValueStore,
    genesis_hash: &H256,
) -> anyhow::Result<Option<Genesis>> {
    db.read_obj(&schema::genesis_state_key(genesis_hash))
}

pub fn write_genesis_state(
    db: &impl KeyValueStore,
    genesis_hash: &H256,
    genesis: &Genesis,
) -> anyhow::Result<()> {
    db.write_obj(&schema::genesis_state_key(genesis_hash), genesis)
}
