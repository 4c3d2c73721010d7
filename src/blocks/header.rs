// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::utils::encoding::{
    append_biguint, append_hash, decode_biguint, decode_fixed_bytes, decode_hash, keccak_hash,
};
use ethereum_types::{Address, Bloom, H64, H256};
use num_bigint::BigUint;
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

/// `Keccak256(RLP([]))`, the uncle hash of blocks without uncles.
pub const EMPTY_UNCLE_HASH: H256 = H256([
    0x1d, 0xcc, 0x4d, 0xe8, 0xde, 0xc7, 0x5d, 0x7a, 0xab, 0x85, 0xb5, 0x67, 0xb6, 0xcc, 0xd4, 0x1a,
    0xd3, 0x12, 0x45, 0x1b, 0x94, 0x8a, 0x74, 0x13, 0xf0, 0xa1, 0x42, 0xfd, 0x40, 0xd4, 0x93, 0x47,
]);

/// Number of fields of a header that predates the base fee.
const LEGACY_FIELD_COUNT: usize = 15;

/// An Ethereum block header. The RLP form is the 15 legacy fields, followed
/// by the base fee once London is active.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Header {
    pub parent_hash: H256,
    pub uncle_hash: H256,
    pub coinbase: Address,
    /// Root of the account trie after this block.
    pub root: H256,
    pub tx_hash: H256,
    pub receipt_hash: H256,
    pub bloom: Bloom,
    pub difficulty: BigUint,
    pub number: u64,
    pub gas_limit: u64,
    pub gas_used: u64,
    /// Block creation time, in seconds since the Unix epoch
    pub time: u64,
    pub extra: Vec<u8>,
    pub mix_digest: H256,
    pub nonce: H64,
    pub base_fee: Option<BigUint>,
}

impl Header {
    /// `Keccak256` of the RLP encoded header.
    pub fn hash(&self) -> H256 {
        keccak_hash(rlp::encode(self))
    }
}

impl Encodable for Header {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(LEGACY_FIELD_COUNT + usize::from(self.base_fee.is_some()));
        append_hash(s, &self.parent_hash);
        append_hash(s, &self.uncle_hash);
        s.append(&self.coinbase.as_bytes());
        append_hash(s, &self.root);
        append_hash(s, &self.tx_hash);
        append_hash(s, &self.receipt_hash);
        s.append(&self.bloom.as_bytes());
        append_biguint(s, &self.difficulty);
        s.append(&self.number);
        s.append(&self.gas_limit);
        s.append(&self.gas_used);
        s.append(&self.time);
        s.append(&self.extra);
        append_hash(s, &self.mix_digest);
        s.append(&self.nonce.as_bytes());
        if let Some(base_fee) = &self.base_fee {
            append_biguint(s, base_fee);
        }
    }
}

impl Decodable for Header {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        let base_fee = match rlp.item_count()? {
            LEGACY_FIELD_COUNT => None,
            16 => Some(decode_biguint(&rlp.at(15)?)?),
            _ => return Err(DecoderError::RlpIncorrectListLen),
        };
        Ok(Header {
            parent_hash: decode_hash(&rlp.at(0)?)?,
            uncle_hash: decode_hash(&rlp.at(1)?)?,
            coinbase: Address::from_slice(decode_fixed_bytes(&rlp.at(2)?, 20)?),
            root: decode_hash(&rlp.at(3)?)?,
            tx_hash: decode_hash(&rlp.at(4)?)?,
            receipt_hash: decode_hash(&rlp.at(5)?)?,
            bloom: Bloom::from_slice(decode_fixed_bytes(&rlp.at(6)?, 256)?),
            difficulty: decode_biguint(&rlp.at(7)?)?,
            number: rlp.val_at(8)?,
            gas_limit: rlp.val_at(9)?,
            gas_used: rlp.val_at(10)?,
            time: rlp.val_at(11)?,
            extra: rlp.val_at(12)?,
            mix_digest: decode_hash(&rlp.at(13)?)?,
            nonce: H64::from_slice(decode_fixed_bytes(&rlp.at(14)?, 8)?),
            base_fee,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::EMPTY_ROOT_HASH;
    use std::str::FromStr as _;

    fn mainnet_genesis() -> Header {
        Header {
            uncle_hash: EMPTY_UNCLE_HASH,
            root: H256::from_str(
                "d7f8974fb5ac78d9ac099b9ad5018bedc2ce0a72dad1827a1709da30580f0544",
            )
            .unwrap(),
            tx_hash: EMPTY_ROOT_HASH,
            receipt_hash: EMPTY_ROOT_HASH,
            difficulty: BigUint::from(17_179_869_184u64),
            gas_limit: 5000,
            extra: hex::decode("11bbe8db4e347b4e8c937c1c8370e4b5ed33adb3db69cbdb7a38e1e50b1b82fa")
                .unwrap(),
            nonce: H64::from_low_u64_be(0x42),
            ..Default::default()
        }
    }

    #[test]
    fn empty_uncle_hash_matches_digest() {
        assert_eq!(keccak_hash([0xc0]), EMPTY_UNCLE_HASH);
    }

    #[test]
    fn mainnet_genesis_hash() {
        assert_eq!(
            mainnet_genesis().hash(),
            H256::from_str("d4e56740f876aef8c010b86a40d5f56745a118d0906a34e69aec8c0db1cb8fa3")
                .unwrap()
        );
    }

    #[test]
    fn decode_legacy_and_london_headers() {
        let legacy = mainnet_genesis();
        assert_eq!(
            rlp::decode::<Header>(&rlp::encode(&legacy)).unwrap(),
            legacy
        );

        let london = Header {
            base_fee: Some(BigUint::from(1_000_000_000u32)),
            ..legacy.clone()
        };
        let encoded = rlp::encode(&london);
        assert_eq!(Rlp::new(&encoded).item_count().unwrap(), 16);
        assert_eq!(rlp::decode::<Header>(&encoded).unwrap(), london);
        assert_ne!(london.hash(), legacy.hash());
    }

    #[test]
    fn truncated_header_is_rejected() {
        let mut s = RlpStream::new_list(3);
        s.append(&1u8).append(&2u8).append(&3u8);
        assert_eq!(
            rlp::decode::<Header>(&s.out()),
            Err(DecoderError::RlpIncorrectListLen)
        );
    }
}
