// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Row keys of the legacy chain database. The layout is shared with the
//! consensus client that later boots from the migrated database, so every
//! prefix here is part of the on-disk format.

use ethereum_types::H256;

/// Hash of the current canonical head header.
pub const HEAD_HEADER_KEY: &[u8] = b"LastHeader";
/// Hash of the current canonical head block.
pub const HEAD_BLOCK_KEY: &[u8] = b"LastBlock";
/// Hash of the head block of the last fast sync.
pub const HEAD_FAST_BLOCK_KEY: &[u8] = b"LastFast";

pub const HEADER_PREFIX: u8 = b'h';
pub const HEADER_TD_SUFFIX: u8 = b't';
pub const HEADER_HASH_SUFFIX: u8 = b'n';
pub const HEADER_NUMBER_PREFIX: u8 = b'H';
pub const BLOCK_BODY_PREFIX: u8 = b'b';
pub const BLOCK_RECEIPTS_PREFIX: u8 = b'r';
pub const CODE_PREFIX: u8 = b'c';

pub const PREIMAGE_PREFIX: &[u8] = b"secure-key-";
pub const CONFIG_PREFIX: &[u8] = b"ethereum-config-";
pub const GENESIS_PREFIX: &[u8] = b"ethereum-genesis-";

fn prefixed(prefix: &[u8], parts: &[&[u8]]) -> Vec<u8> {
    let len = prefix.len() + parts.iter().map(|p| p.len()).sum::<usize>();
    let mut key = Vec::with_capacity(len);
    key.extend_from_slice(prefix);
    for part in parts {
        key.extend_from_slice(part);
    }
    key
}

/// `h + num (uint64 big endian) + hash`
pub fn header_key(number: u64, hash: &H256) -> Vec<u8> {
    prefixed(&[HEADER_PREFIX], &[&number.to_be_bytes(), hash.as_bytes()])
}

/// `h + num (uint64 big endian) + hash + t`
pub fn header_td_key(number: u64, hash: &H256) -> Vec<u8> {
    prefixed(
        &[HEADER_PREFIX],
        &[&number.to_be_bytes(), hash.as_bytes(), &[HEADER_TD_SUFFIX]],
    )
}

/// `h + num (uint64 big endian) + n`
pub fn header_hash_key(number: u64) -> Vec<u8> {
    prefixed(
        &[HEADER_PREFIX],
        &[&number.to_be_bytes(), &[HEADER_HASH_SUFFIX]],
    )
}

/// `H + hash`
pub fn header_number_key(hash: &H256) -> Vec<u8> {
    prefixed(&[HEADER_NUMBER_PREFIX], &[hash.as_bytes()])
}

/// `b + num (uint64 big endian) + hash`
pub fn block_body_key(number: u64, hash: &H256) -> Vec<u8> {
    prefixed(
        &[BLOCK_BODY_PREFIX],
        &[&number.to_be_bytes(), hash.as_bytes()],
    )
}

/// `r + num (uint64 big endian) + hash`
pub fn block_receipts_key(number: u64, hash: &H256) -> Vec<u8> {
    prefixed(
        &[BLOCK_RECEIPTS_PREFIX],
        &[&number.to_be_bytes(), hash.as_bytes()],
    )
}

/// `c + code hash`
pub fn code_key(hash: &H256) -> Vec<u8> {
    prefixed(&[CODE_PREFIX], &[hash.as_bytes()])
}

/// `secure-key- + hash`
pub fn preimage_key(hash: &H256) -> Vec<u8> {
    prefixed(PREIMAGE_PREFIX, &[hash.as_bytes()])
}

/// `ethereum-config- + genesis hash`
pub fn config_key(hash: &H256) -> Vec<u8> {
    prefixed(CONFIG_PREFIX, &[hash.as_bytes()])
}

/// `ethereum-genesis- + genesis hash`
pub fn genesis_state_key(hash: &H256) -> Vec<u8> {
    prefixed(GENESIS_PREFIX, &[hash.as_bytes()])
}

/// Content-addressed rows: bare 32-byte trie node keys and code keys.
pub fn is_state_key(key: &[u8]) -> bool {
    key.len() == 32 || (key.len() == 33 && key[0] == CODE_PREFIX)
}
