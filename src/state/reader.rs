// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{AccountRecord, Error, decode_storage_value};
use crate::db::{KeyValueStore, rawdb};
use crate::trie::{self, SecureTrie};
use crate::utils::encoding::EMPTY_CODE_HASH;
use ethereum_types::{Address, H256};

/// Read-only view of a state root in the input database.
pub struct StateReader<'db, DB> {
    db: &'db DB,
    accounts: SecureTrie<&'db DB>,
}

impl<'db, DB> StateReader<'db, DB>
where
    DB: KeyValueStore,
{
    pub fn open(db: &'db DB, root: H256) -> Result<Self, Error> {
        Ok(Self {
            db,
            accounts: SecureTrie::open(db, root)?,
        })
    }

    pub fn root(&self) -> H256 {
        self.accounts.hash()
    }

    pub fn account(&self, addr: &Address) -> Result<Option<AccountRecord>, Error> {
        self.accounts
            .get(addr.as_bytes())?
            .map(|raw| {
                rlp::decode(&raw).map_err(|e| Error::decode(format!("account {addr:#x}"), e))
            })
            .transpose()
    }

    /// Opens the storage trie with the given root.
    pub fn storage_trie(&self, storage_root: H256) -> Result<SecureTrie<&'db DB>, Error> {
        Ok(SecureTrie::open(self.db, storage_root)?)
    }

    /// Storage trie of `addr`, empty if the account does not exist.
    pub fn account_storage(&self, addr: &Address) -> Result<SecureTrie<&'db DB>, Error> {
        match self.account(addr)? {
            Some(account) => self.storage_trie(account.storage_root),
            None => Ok(SecureTrie::new(self.db)),
        }
    }

    #[cfg(test)]
    pub fn storage_at(&self, addr: &Address, key: &H256) -> Result<H256, Error> {
        storage_value(&self.account_storage(addr)?, key)
    }

    /// Contract code for `code_hash`. Accounts without code get an empty
    /// vector; a hash that is not in the database is an error.
    pub fn code(&self, code_hash: &H256) -> Result<Vec<u8>, Error> {
        if *code_hash == EMPTY_CODE_HASH {
            return Ok(Vec::new());
        }
        rawdb::read_code(self.db, code_hash)?.ok_or(Error::MissingCode(*code_hash))
    }

    /// All accounts, in address-hash order, with addresses recovered from
    /// their preimages.
    pub fn accounts(&self) -> impl Iterator<Item = Result<(Address, AccountRecord), Error>> + '_ {
        self.accounts.iter().map(|item| -> Result<_, Error> {
            let (hashed, raw) = item?;
            let hashed = path_hash(&hashed)?;
            let account = rlp::decode::<AccountRecord>(&raw)
                .map_err(|e| Error::decode(format!("account at {hashed:#x}"), e))?;
            let preimage = self.accounts.require_key(&hashed)?;
            if preimage.len() != Address::len_bytes() {
                return Err(invalid(format!(
                    "preimage of {hashed:#x} is {} bytes, not an address",
                    preimage.len()
                )));
            }
            Ok((Address::from_slice(&preimage), account))
        })
    }
}

/// Reads a slot from a storage trie. Absent slots are zero.
pub fn storage_value<DB: KeyValueStore>(
    storage: &SecureTrie<DB>,
    key: &H256,
) -> Result<H256, Error> {
    match storage.get(key.as_bytes())? {
        Some(raw) => decode_storage_value(&raw)
            .map_err(|e| Error::decode(format!("storage slot {key:#x}"), e)),
        None => Ok(H256::zero()),
    }
}

/// All `(slot, value)` pairs of a storage trie, with slots recovered from
/// their preimages.
pub fn storage_entries<DB: KeyValueStore>(
    storage: &SecureTrie<DB>,
) -> impl Iterator<Item = Result<(H256, H256), Error>> + '_ {
    storage.iter().map(|item| -> Result<_, Error> {
        let (hashed, raw) = item?;
        let hashed = path_hash(&hashed)?;
        let value = decode_storage_value(&raw).map_err(|e| {
            Error::decode(format!("storage value at {hashed:#x}"), e)
        })?;
        let slot = storage.require_key(&hashed)?;
        if slot.len() != 32 {
            return Err(invalid(format!(
                "preimage of {hashed:#x} is {} bytes, not a storage slot",
                slot.len()
            )));
        }
        Ok((H256::from_slice(&slot), value))
    })
}

fn path_hash(path: &[u8]) -> Result<H256, Error> {
    if path.len() != 32 {
        return Err(invalid(format!(
            "key of {} bytes in a secure trie",
            path.len()
        )));
    }
    Ok(H256::from_slice(path))
}

fn invalid(msg: String) -> Error {
    Error::Trie(trie::Error::Invalid(msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDB;
    use crate::state::{StateWriter, encode_storage_value};
    use crate::utils::encoding::keccak_hash;
    use num_bigint::BigUint;

    #[test]
    fn reads_back_written_state() -> anyhow::Result<()> {
        let db = MemoryDB::default();
        let alice = Address::repeat_byte(0xa1);
        let bob = Address::repeat_byte(0xb0);
        let slot = H256::from_low_u64_be(1);
        let mut writer = StateWriter::new(&db);
        writer.add_balance(alice, &BigUint::from(5u8));
        writer.set_code(bob, b"code".to_vec());
        writer.set_nonce(bob, 3);
        writer.set_storage(bob, slot, H256::from_low_u64_be(9))?;
        let root = writer.commit()?;

        let reader = StateReader::open(&db, root)?;
        assert_eq!(reader.root(), root);
        let alice_account = reader.account(&alice)?.expect("alice exists");
        assert_eq!(alice_account.balance, BigUint::from(5u8));
        let bob_account = reader.account(&bob)?.expect("bob exists");
        assert_eq!(bob_account.nonce, 3);
        assert_eq!(reader.code(&bob_account.code_hash)?, b"code".to_vec());
        assert_eq!(reader.storage_at(&bob, &slot)?, H256::from_low_u64_be(9));
        assert_eq!(reader.storage_at(&alice, &slot)?, H256::zero());
        assert_eq!(reader.account(&Address::zero())?, None);

        let mut seen = reader
            .accounts()
            .map(|a| a.map(|(addr, _)| addr))
            .collect::<Result<Vec<_>, _>>()?;
        seen.sort();
        assert_eq!(seen, vec![alice, bob]);

        let storage = reader.storage_trie(bob_account.storage_root)?;
        let entries = storage_entries(&storage).collect::<Result<Vec<_>, _>>()?;
        assert_eq!(entries, vec![(slot, H256::from_low_u64_be(9))]);
        Ok(())
    }

    #[test]
    fn missing_code_is_an_error() -> anyhow::Result<()> {
        let db = MemoryDB::default();
        let reader = StateReader::open(&db, trie::EMPTY_ROOT_HASH)?;
        assert!(reader.code(&EMPTY_CODE_HASH)?.is_empty());
        let hash = keccak_hash(b"gone");
        assert!(matches!(reader.code(&hash), Err(Error::MissingCode(h)) if h == hash));
        assert_eq!(reader.accounts().count(), 0);
        Ok(())
    }

    #[test]
    fn missing_preimage_is_an_error() -> anyhow::Result<()> {
        let db = MemoryDB::default();
        // written through the plain trie, so no preimage is recorded
        let mut plain = trie::Trie::new(&db);
        plain.insert(
            keccak_hash([0x11; 20]).as_bytes(),
            rlp::encode(&AccountRecord::default()).to_vec(),
        )?;
        let root = plain.commit()?;
        let reader = StateReader::open(&db, root)?;
        let first = reader.accounts().next().expect("one account");
        assert!(matches!(
            first,
            Err(Error::Trie(trie::Error::MissingPreimage(_)))
        ));
        Ok(())
    }

    #[test]
    fn undecodable_account_is_a_decode_error() -> anyhow::Result<()> {
        let db = MemoryDB::default();
        let mut accounts = SecureTrie::new(&db);
        accounts.insert(&[0x22; 20], encode_storage_value(&H256::repeat_byte(1)))?;
        let root = accounts.commit()?;
        let reader = StateReader::open(&db, root)?;
        let first = reader.accounts().next().expect("one account");
        assert!(matches!(first, Err(Error::Decode { .. })));
        Ok(())
    }
}
