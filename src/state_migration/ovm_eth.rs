// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Balances of the legacy OVM ETH token contract, which kept the native
//! currency as an ERC20 `mapping(address => uint256)` at storage slot 0.

use crate::db::KeyValueStore;
use crate::state::{self, StateReader, storage_value};
use crate::trie::SecureTrie;
use crate::utils::encoding::keccak_hash;
use ethereum_types::{Address, H160, H256};
use num_bigint::BigUint;
use tracing::warn;

/// `0xDeadDeAddeAddEAddeadDEaDDEAdDeaDDeAD0000`
pub const OVM_ETH_ADDRESS: Address = H160([
    0xde, 0xad, 0xde, 0xad, 0xde, 0xad, 0xde, 0xad, 0xde, 0xad, 0xde, 0xad, 0xde, 0xad, 0xde, 0xad,
    0xde, 0xad, 0x00, 0x00,
]);

/// Declared storage position of the balance mapping.
const BALANCES_SLOT: [u8; 32] = [0; 32];

/// Storage key of `addr`'s balance: `Keccak256(leftpad32(addr) || slot)`.
pub fn balance_key(addr: &Address) -> H256 {
    let mut preimage = [0u8; 64];
    preimage[12..32].copy_from_slice(addr.as_bytes());
    preimage[32..].copy_from_slice(&BALANCES_SLOT);
    keccak_hash(preimage)
}

/// Reads balances out of the token contract's storage trie.
pub struct OvmEthBalances<'db, DB> {
    storage: SecureTrie<&'db DB>,
}

impl<'db, DB> OvmEthBalances<'db, DB>
where
    DB: KeyValueStore,
{
    pub fn open(reader: &StateReader<'db, DB>) -> Result<Self, state::Error> {
        if reader.account(&OVM_ETH_ADDRESS)?.is_none() {
            warn!(addr = ?OVM_ETH_ADDRESS, "OVM ETH contract not found, all balances are zero");
        }
        Ok(Self {
            storage: reader.account_storage(&OVM_ETH_ADDRESS)?,
        })
    }

    /// Balance of `addr`. An absent slot is a zero balance.
    pub fn balance_of(&self, addr: &Address) -> Result<BigUint, state::Error> {
        let word = storage_value(&self.storage, &balance_key(addr))?;
        Ok(BigUint::from_bytes_be(word.as_bytes()))
    }
}
