// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! World state on top of the secure trie: an account trie keyed by address
//! hash, with one storage trie per account.

mod account;
mod reader;
mod writer;

pub use account::{AccountRecord, decode_storage_value, encode_storage_value};
pub use reader::{StateReader, storage_entries, storage_value};
pub use writer::StateWriter;

use crate::trie;
use ethereum_types::H256;
use rlp::DecoderError;
use thiserror::Error;

/// State error
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Trie(#[from] trie::Error),
    /// An account record or storage value could not be decoded.
    #[error("cannot decode {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: DecoderError,
    },
    /// An account refers to code that is not in the database.
    #[error("code {0:#x} not found")]
    MissingCode(H256),
    #[error(transparent)]
    Db(#[from] anyhow::Error),
}

impl Error {
    pub(crate) fn decode(what: impl Into<String>, source: DecoderError) -> Self {
        Self::Decode {
            what: what.into(),
            source,
        }
    }
}
