// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

#[cfg(test)]
mod memory;
pub mod parity_db;
pub mod parity_db_config;
pub mod rawdb;

#[cfg(test)]
pub use memory::MemoryDB;
use serde::Serialize;
#[cfg(test)]
use serde::de::DeserializeOwned;

/// Interface used to store and retrieve raw rows of the chain database.
/// Trie nodes, code blobs, headers and head pointers all go through it.
pub trait KeyValueStore {
    /// Reads a binary row. This should be used for non-serializable data.
    fn read_bin(&self, key: &[u8]) -> anyhow::Result<Option<Vec<u8>>>;

    /// Writes a binary row. This should be used for non-serializable data.
    /// For JSON blobs, use [`KeyValueStoreExt::write_obj`].
    fn write_bin(&self, key: &[u8], value: &[u8]) -> anyhow::Result<()>;

    /// Returns `Ok(true)` if key exists in store.
    fn exists(&self, key: &[u8]) -> anyhow::Result<bool>;

    /// Writes many rows at once. Stores that support atomic commits should
    /// override this.
    fn write_batch<K, V, I>(&self, entries: I) -> anyhow::Result<()>
    where
        Self: Sized,
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in entries {
            self.write_bin(key.as_ref(), value.as_ref())?;
        }
        Ok(())
    }
}

impl<T: KeyValueStore> KeyValueStore for &T {
    fn read_bin(&self, key: &[u8]) -> anyhow::Result<Option<Vec<u8>>> {
        (*self).read_bin(key)
    }

    fn write_bin(&self, key: &[u8], value: &[u8]) -> anyhow::Result<()> {
        (*self).write_bin(key, value)
    }

    fn exists(&self, key: &[u8]) -> anyhow::Result<bool> {
        (*self).exists(key)
    }

    fn write_batch<K, V, I>(&self, entries: I) -> anyhow::Result<()>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
        I: IntoIterator<Item = (K, V)>,
    {
        (*self).write_batch(entries)
    }
}

/// Extension trait for the [`KeyValueStore`] trait. It is implemented for all types that implement
/// [`KeyValueStore`].
/// It provides methods for writing and reading any JSON-serializable object from the store.
pub trait KeyValueStoreExt {
    fn write_obj<V: Serialize>(&self, key: &[u8], value: &V) -> anyhow::Result<()>;

    /// Reads back a row written by [`KeyValueStoreExt::write_obj`]. The tool
    /// only writes these rows.
    #[cfg(test)]
    fn read_obj<V: DeserializeOwned>(&self, key: &[u8]) -> anyhow::Result<Option<V>>;
}

impl<T: ?Sized + KeyValueStore> KeyValueStoreExt for T {
    fn write_obj<V: Serialize>(&self, key: &[u8], value: &V) -> anyhow::Result<()> {
        self.write_bin(key, &serde_json::to_vec(value)?)
    }

    #[cfg(test)]
    fn read_obj<V: DeserializeOwned>(&self, key: &[u8]) -> anyhow::Result<Option<V>> {
        match self.read_bin(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

/// Traits for collecting DB stats
pub trait DBStatistics {
    fn get_statistics(&self) -> Option<String> {
        None
    }
}

pub mod db_engine {
    use std::path::{Path, PathBuf};

    pub type Db = crate::db::parity_db::ParityDb;
    pub type DbConfig = crate::db::parity_db_config::ParityDbConfig;

    /// Location of the chain database inside a legacy node data directory.
    pub fn db_root(data_dir: &Path) -> PathBuf {
        data_dir.join("geth").join("chaindata")
    }

    pub fn open_db(path: &Path, config: &DbConfig) -> anyhow::Result<Db> {
        Db::open(path, config)
    }

    pub fn open_db_read_only(path: &Path, config: &DbConfig) -> anyhow::Result<Db> {
        Db::open_read_only(path, config)
    }
}
