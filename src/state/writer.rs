// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{AccountRecord, Error, encode_storage_value};
use crate::db::{KeyValueStore, rawdb};
use crate::trie::SecureTrie;
use crate::utils::encoding::{EMPTY_CODE_HASH, keccak_hash};
use ahash::HashMap;
use ethereum_types::{Address, H256};
use num_bigint::BigUint;

struct StateObject<'db, DB> {
    record: AccountRecord,
    /// Code set since the last commit.
    code: Option<Vec<u8>>,
    /// Opened on the first storage write.
    storage: Option<SecureTrie<&'db DB>>,
    dirty: bool,
}

impl<DB> Default for StateObject<'_, DB> {
    fn default() -> Self {
        Self {
            record: AccountRecord::default(),
            code: None,
            storage: None,
            dirty: true,
        }
    }
}

/// Buffers account mutations over an initially empty state and writes them
/// out on [`StateWriter::commit`]. Every touched account is kept, even when
/// it ends up with zero balance, zero nonce and no code.
pub struct StateWriter<'db, DB> {
    db: &'db DB,
    accounts: SecureTrie<&'db DB>,
    objects: HashMap<Address, StateObject<'db, DB>>,
}

impl<'db, DB> StateWriter<'db, DB>
where
    DB: KeyValueStore,
{
    pub fn new(db: &'db DB) -> Self {
        Self {
            db,
            accounts: SecureTrie::new(db),
            objects: HashMap::default(),
        }
    }

    fn object(&mut self, addr: Address) -> &mut StateObject<'db, DB> {
        let object = self.objects.entry(addr).or_default();
        object.dirty = true;
        object
    }

    /// Number of accounts touched so far.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn add_balance(&mut self, addr: Address, amount: &BigUint) {
        self.object(addr).record.balance += amount;
    }

    pub fn set_code(&mut self, addr: Address, code: Vec<u8>) {
        let object = self.object(addr);
        if code.is_empty() {
            object.record.code_hash = EMPTY_CODE_HASH;
            object.code = None;
        } else {
            object.record.code_hash = keccak_hash(&code);
            object.code = Some(code);
        }
    }

    pub fn set_nonce(&mut self, addr: Address, nonce: u64) {
        self.object(addr).record.nonce = nonce;
    }

    /// Sets a storage slot. A zero value deletes the slot.
    pub fn set_storage(&mut self, addr: Address, key: H256, value: H256) -> Result<(), Error> {
        let db = self.db;
        let object = self.object(addr);
        let storage = match object.storage.take() {
            Some(storage) => storage,
            None => SecureTrie::open(db, object.record.storage_root)?,
        };
        let storage = object.storage.insert(storage);
        let encoded = if value.is_zero() {
            Vec::new()
        } else {
            encode_storage_value(&value)
        };
        storage.insert(key.as_bytes(), encoded)?;
        Ok(())
    }

    /// Writes storage tries, code and the account trie, and returns the new
    /// state root. Committing again without changes yields the same root.
    pub fn commit(&mut self) -> Result<H256, Error> {
        for (addr, object) in self.objects.iter_mut().filter(|(_, o)| o.dirty) {
            if let Some(storage) = object.storage.as_mut() {
                object.record.storage_root = storage.commit()?;
            }
            if let Some(code) = object.code.take() {
                rawdb::write_code(self.db, &object.record.code_hash, &code)?;
            }
            self.accounts
                .insert(addr.as_bytes(), rlp::encode(&object.record).to_vec())?;
            object.dirty = false;
        }
        Ok(self.accounts.commit()?)
    }
}
