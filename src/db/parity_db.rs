// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::PathBuf;

use super::KeyValueStore;
use crate::db::{DBStatistics, parity_db_config::ParityDbConfig, rawdb::schema};

use anyhow::{Context as _, anyhow};
use parity_db::{CompressionType, Db, Operation, Options};
use strum::{Display, EnumIter, FromRepr, IntoEnumIterator};
use tracing::warn;

/// It is used to determine which column to use for a given row.
#[derive(Copy, Clone, Debug, Display, PartialEq, FromRepr, EnumIter)]
#[repr(u8)]
enum DbColumn {
    /// Content-addressed rows: trie nodes keyed by their hash and contract
    /// code keyed by its code hash. Values never change for a given key.
    State,
    /// Every other row: headers, bodies, receipts, preimages, head pointers
    /// and JSON blobs.
    Chain,
}

impl DbColumn {
    fn create_column_options(compression: CompressionType) -> Vec<parity_db::ColumnOptions> {
        DbColumn::iter()
            .map(|col| match col {
                DbColumn::State => parity_db::ColumnOptions {
                    preimage: true,
                    compression,
                    ..Default::default()
                },
                DbColumn::Chain => parity_db::ColumnOptions {
                    // explicitly disable preimage for chain column
                    // otherwise we are not able to overwrite head pointers
                    preimage: false,
                    btree_index: true,
                    compression,
                    ..Default::default()
                },
            })
            .collect()
    }
}

pub struct ParityDb {
    pub db: parity_db::Db,
    statistics_enabled: bool,
}

impl ParityDb {
    fn to_options(path: PathBuf, config: &ParityDbConfig) -> anyhow::Result<Options> {
        let mut options = Options::with_columns(&path, DbColumn::iter().count() as u8);
        options.columns = DbColumn::create_column_options(config.compression_type()?);
        options.stats = config.enable_statistics;
        options.sync_wal = true;
        options.sync_data = true;
        Ok(options)
    }

    /// Opens the database at `path` for reading and writing, creating it if needed.
    pub fn open(path: impl Into<PathBuf>, config: &ParityDbConfig) -> anyhow::Result<Self> {
        let opts = Self::to_options(path.into(), config)?;
        Ok(Self {
            db: Db::open_or_create(&opts)?,
            statistics_enabled: opts.stats,
        })
    }

    /// Opens an existing database without write access.
    pub fn open_read_only(
        path: impl Into<PathBuf>,
        config: &ParityDbConfig,
    ) -> anyhow::Result<Self> {
        let opts = Self::to_options(path.into(), config)?;
        Ok(Self {
            db: Db::open_read_only(&opts)?,
            statistics_enabled: opts.stats,
        })
    }

    fn choose_column(key: &[u8]) -> DbColumn {
        if schema::is_state_key(key) {
            DbColumn::State
        } else {
            DbColumn::Chain
        }
    }

    fn read_from_column<K>(&self, key: K, column: DbColumn) -> anyhow::Result<Option<Vec<u8>>>
    where
        K: AsRef<[u8]>,
    {
        self.db
            .get(column as u8, key.as_ref())
            .map_err(|e| anyhow!("error from column {column}: {e}"))
    }

    fn write_to_column<K, V>(&self, key: K, value: V, column: DbColumn) -> anyhow::Result<()>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        let tx = [(column as u8, key.as_ref(), Some(value.as_ref().to_vec()))];
        self.db
            .commit(tx)
            .map_err(|e| anyhow!("error writing to column {column}: {e}"))
    }
}

impl KeyValueStore for ParityDb {
    fn read_bin(&self, key: &[u8]) -> anyhow::Result<Option<Vec<u8>>> {
        self.read_from_column(key, Self::choose_column(key))
    }

    fn write_bin(&self, key: &[u8], value: &[u8]) -> anyhow::Result<()> {
        self.write_to_column(key, value, Self::choose_column(key))
    }

    fn exists(&self, key: &[u8]) -> anyhow::Result<bool> {
        self.db
            .get_size(Self::choose_column(key) as u8, key)
            .map(|size| size.is_some())
            .context("error checking if key exists")
    }

    fn write_batch<K, V, I>(&self, entries: I) -> anyhow::Result<()>
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
        I: IntoIterator<Item = (K, V)>,
    {
        let tx = entries.into_iter().map(|(k, v)| {
            let column = Self::choose_column(k.as_ref());
            (
                column as u8,
                Operation::Set(k.as_ref().to_vec(), v.as_ref().to_vec()),
            )
        });
        self.db
            .commit_changes(tx)
            .map_err(|e| anyhow!("error bulk writing: {e}"))
    }
}

impl DBStatistics for ParityDb {
    fn get_statistics(&self) -> Option<String> {
        if !self.statistics_enabled {
            return None;
        }

        let mut buf = Vec::new();
        if let Err(err) = self.db.write_stats_text(&mut buf, None) {
            warn!("Unable to write database statistics: {err}");
            return None;
        }

        match String::from_utf8(buf) {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!("Malformed statistics: {e}");
                None
            }
        }
    }
}
