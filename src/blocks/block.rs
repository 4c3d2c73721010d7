// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::sync::OnceLock;

use super::{EMPTY_UNCLE_HASH, Header};
use crate::trie::EMPTY_ROOT_HASH;
use ethereum_types::{Bloom, H256};
use rlp::RlpStream;

/// A block without transactions, uncles or receipts, such as a genesis block.
/// The header hash is computed once and cached.
#[derive(Debug, Clone)]
pub struct Block {
    header: Header,
    hash: OnceLock<H256>,
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.hash() == other.hash()
    }
}

impl Eq for Block {}

impl Block {
    /// Builds an empty-bodied block. The transaction, receipt and uncle
    /// commitments of `header` are replaced by their empty values.
    pub fn new(mut header: Header) -> Self {
        header.tx_hash = EMPTY_ROOT_HASH;
        header.receipt_hash = EMPTY_ROOT_HASH;
        header.uncle_hash = EMPTY_UNCLE_HASH;
        header.bloom = Bloom::zero();
        Self {
            header,
            hash: OnceLock::new(),
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn hash(&self) -> H256 {
        *self.hash.get_or_init(|| self.header.hash())
    }

    pub fn number(&self) -> u64 {
        self.header.number
    }

    pub fn state_root(&self) -> H256 {
        self.header.root
    }

    /// RLP of the body, `[transactions, uncles]`, both empty.
    pub fn body_rlp(&self) -> Vec<u8> {
        let mut s = RlpStream::new_list(2);
        s.begin_list(0);
        s.begin_list(0);
        s.out().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_block_clears_body_commitments() {
        let header = Header {
            tx_hash: H256::repeat_byte(1),
            receipt_hash: H256::repeat_byte(2),
            uncle_hash: H256::repeat_byte(3),
            root: H256::repeat_byte(4),
            ..Default::default()
        };
        let block = Block::new(header);
        assert_eq!(block.header().tx_hash, EMPTY_ROOT_HASH);
        assert_eq!(block.header().receipt_hash, EMPTY_ROOT_HASH);
        assert_eq!(block.header().uncle_hash, EMPTY_UNCLE_HASH);
        assert_eq!(block.state_root(), H256::repeat_byte(4));
        assert_eq!(block.hash(), block.header().hash());
    }

    #[test]
    fn body_is_two_empty_lists() {
        let block = Block::new(Header::default());
        assert_eq!(block.body_rlp(), vec![0xc2, 0xc0, 0xc0]);
    }
}
