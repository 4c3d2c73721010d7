// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::{Path, PathBuf};

use crate::state;
use thiserror::Error;

/// Migration error. Every kind aborts the run; the output database of a
/// failed run must be discarded.
#[derive(Debug, Error)]
pub enum Error {
    /// A database could not be opened. Nothing was written.
    #[error("cannot open {which} database at {}: {error:#}", path.display())]
    IoOpen {
        which: &'static str,
        path: PathBuf,
        error: anyhow::Error,
    },
    /// Reading the legacy database failed below the state layer.
    #[error("cannot read legacy database: {0:#}")]
    LegacyDb(anyhow::Error),
    /// The legacy state is inconsistent: a missing node, code or preimage,
    /// or a node that does not decode.
    #[error("corrupt legacy state: {0}")]
    TrieCorrupt(state::Error),
    /// An account record or storage value could not be decoded.
    #[error("decode failed: {0}")]
    Decode(state::Error),
    /// A legacy account holds a native balance, or the carried balances do
    /// not add up to the expected supply.
    #[error("supply invariant violated: {0}")]
    SupplyInvariant(String),
    /// Writing or verifying the output failed.
    #[error("commit failed: {0:#}")]
    Commit(anyhow::Error),
    /// No state root was given and the legacy database has no head block.
    #[error("no state root given and the legacy database has no head block")]
    MissingHead,
}

/// Classifies errors raised while reading the legacy state.
impl From<state::Error> for Error {
    fn from(e: state::Error) -> Self {
        match e {
            state::Error::Decode { .. } => Self::Decode(e),
            _ => Self::TrieCorrupt(e),
        }
    }
}

impl Error {
    pub(super) fn io_open(which: &'static str, path: &Path, error: anyhow::Error) -> Self {
        Self::IoOpen {
            which,
            path: path.to_path_buf(),
            error,
        }
    }

    pub(super) fn commit(e: impl Into<anyhow::Error>) -> Self {
        Self::Commit(e.into())
    }
}
