// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use ethereum_types::H256;
use rlp::DecoderError;
use thiserror::Error;

/// Trie error
#[derive(Debug, Error)]
pub enum Error {
    /// A node referenced by hash is not in the database.
    #[error("missing trie node {0:#x}")]
    MissingNode(H256),
    /// A hashed key has no recorded preimage.
    #[error("missing preimage of {0:#x}")]
    MissingPreimage(H256),
    /// A node could not be decoded.
    #[error("malformed trie node: {0}")]
    Decode(#[from] DecoderError),
    /// A node decoded but its content violates the trie layout.
    #[error("invalid trie: {0}")]
    Invalid(String),
    /// Dynamic error for when the error needs to be forwarded as is.
    #[error("{0}")]
    Dynamic(anyhow::Error),
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        e.downcast::<Error>().unwrap_or_else(Self::Dynamic)
    }
}
