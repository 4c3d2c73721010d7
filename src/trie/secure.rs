// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{Error, Trie, TrieIter};
use crate::db::{KeyValueStore, rawdb};
use crate::utils::encoding::keccak_hash;
use ahash::HashMap;
use ethereum_types::H256;

/// A trie whose keys are hashed with Keccak-256 before use. The original
/// keys are remembered as preimages and written next to the nodes on
/// commit, so that they can be recovered while iterating.
#[derive(Debug)]
pub struct SecureTrie<DB> {
    trie: Trie<DB>,
    preimages: HashMap<H256, Vec<u8>>,
}

impl<DB> SecureTrie<DB>
where
    DB: KeyValueStore,
{
    pub fn new(db: DB) -> Self {
        Self {
            trie: Trie::new(db),
            preimages: HashMap::default(),
        }
    }

    pub fn open(db: DB, root: H256) -> Result<Self, Error> {
        Ok(Self {
            trie: Trie::open(db, root)?,
            preimages: HashMap::default(),
        })
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, Error> {
        self.trie.get(keccak_hash(key).as_bytes())
    }

    /// Sets `key` to `value`. An empty value removes the key.
    pub fn insert(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), Error> {
        let hashed = keccak_hash(key);
        if !value.is_empty() {
            self.preimages.entry(hashed).or_insert_with(|| key.to_vec());
        }
        self.trie.insert(hashed.as_bytes(), value)
    }

    /// Recovers the key that hashes to `hashed`, looking at pending
    /// preimages first and then at the store.
    pub fn get_key(&self, hashed: &H256) -> Result<Option<Vec<u8>>, Error> {
        if let Some(key) = self.preimages.get(hashed) {
            return Ok(Some(key.clone()));
        }
        Ok(rawdb::read_preimage(self.trie.db(), hashed)?)
    }

    /// Same as [`SecureTrie::get_key`], but a missing preimage is an error.
    pub fn require_key(&self, hashed: &H256) -> Result<Vec<u8>, Error> {
        self.get_key(hashed)?.ok_or(Error::MissingPreimage(*hashed))
    }

    pub fn hash(&self) -> H256 {
        self.trie.hash()
    }

    /// Writes pending preimages and nodes, returning the root hash.
    pub fn commit(&mut self) -> Result<H256, Error> {
        if !self.preimages.is_empty() {
            rawdb::write_preimages(self.trie.db(), &self.preimages)?;
            self.preimages.clear();
        }
        self.trie.commit()
    }

    /// Iterates over `(hashed key, value)` pairs in hashed key order.
    pub fn iter(&self) -> TrieIter<'_, DB> {
        self.trie.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDB;

    #[test]
    fn preimages_survive_commit() -> anyhow::Result<()> {
        let db = MemoryDB::default();
        let mut trie = SecureTrie::new(&db);
        let key = vec![0x42; 20];
        trie.insert(&key, b"value".to_vec())?;
        let hashed = keccak_hash(&key);
        assert_eq!(trie.get_key(&hashed)?, Some(key.clone()));

        let root = trie.commit()?;
        let reopened = SecureTrie::open(&db, root)?;
        assert_eq!(reopened.get(&key)?, Some(b"value".to_vec()));
        assert_eq!(reopened.get_key(&hashed)?, Some(key));

        let (first, _) = reopened.iter().next().expect("one entry")?;
        assert_eq!(first, hashed.as_bytes());
        Ok(())
    }

    #[test]
    fn unknown_preimage_is_none() -> anyhow::Result<()> {
        let db = MemoryDB::default();
        let trie = SecureTrie::new(&db);
        let hashed = H256::repeat_byte(1);
        assert_eq!(trie.get_key(&hashed)?, None);
        assert!(matches!(
            trie.require_key(&hashed),
            Err(Error::MissingPreimage(h)) if h == hashed
        ));
        Ok(())
    }
}
