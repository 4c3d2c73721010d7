// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{DBStatistics, KeyValueStore};
use ahash::HashMap;
use parking_lot::RwLock;

#[derive(Debug, Default)]
pub struct MemoryDB {
    db: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryDB {
    pub fn is_empty(&self) -> bool {
        self.db.read().is_empty()
    }

    /// Removes a row to simulate a damaged database.
    pub fn delete(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.db.write().remove(key)
    }
}

impl KeyValueStore for MemoryDB {
    fn read_bin(&self, key: &[u8]) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.db.read().get(key).cloned())
    }

    fn write_bin(&self, key: &[u8], value: &[u8]) -> anyhow::Result<()> {
        self.db.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn exists(&self, key: &[u8]) -> anyhow::Result<bool> {
        Ok(self.db.read().contains_key(key))
    }

    fn write_batch<K, V, I>(&self, entries: I) -> anyhow::Result<()>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut db = self.db.write();
        for (key, value) in entries {
            db.insert(key.as_ref().to_vec(), value.as_ref().to_vec());
        }
        Ok(())
    }
}

impl DBStatistics for MemoryDB {}
