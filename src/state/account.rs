// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::trie::EMPTY_ROOT_HASH;
use crate::utils::encoding::{
    EMPTY_CODE_HASH, append_biguint, append_hash, decode_biguint, decode_hash, trim_leading_zeros,
};
use ethereum_types::H256;
use num_bigint::BigUint;
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

/// Value stored in the account trie: `[nonce, balance, storageRoot, codeHash]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountRecord {
    pub nonce: u64,
    pub balance: BigUint,
    /// Root of the account's storage trie.
    pub storage_root: H256,
    pub code_hash: H256,
}

impl Default for AccountRecord {
    fn default() -> Self {
        Self {
            nonce: 0,
            balance: BigUint::default(),
            storage_root: EMPTY_ROOT_HASH,
            code_hash: EMPTY_CODE_HASH,
        }
    }
}

impl Encodable for AccountRecord {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(4);
        s.append(&self.nonce);
        append_biguint(s, &self.balance);
        append_hash(s, &self.storage_root);
        append_hash(s, &self.code_hash);
    }
}

impl Decodable for AccountRecord {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if rlp.item_count()? != 4 {
            return Err(DecoderError::RlpIncorrectListLen);
        }
        Ok(Self {
            nonce: rlp.val_at(0)?,
            balance: decode_biguint(&rlp.at(1)?)?,
            storage_root: decode_hash(&rlp.at(2)?)?,
            code_hash: decode_hash(&rlp.at(3)?)?,
        })
    }
}

/// Storage values are RLP strings without leading zeros. The payload is
/// right-aligned into a 32-byte word.
pub fn decode_storage_value(raw: &[u8]) -> Result<H256, DecoderError> {
    let payload = Rlp::new(raw).data()?;
    if payload.len() > 32 {
        return Err(DecoderError::RlpIsTooBig);
    }
    let mut word = H256::zero();
    word.as_bytes_mut()[32 - payload.len()..].copy_from_slice(payload);
    Ok(word)
}

pub fn encode_storage_value(value: &H256) -> Vec<u8> {
    rlp::encode(&trim_leading_zeros(value.as_bytes())).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_account_encoding() {
        // nonce 0, balance 0, empty storage root, empty code hash
        let expected = hex::decode(concat!(
            "f8448080",
            "a056e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421",
            "a0c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        ))
        .unwrap();
        assert_eq!(rlp::encode(&AccountRecord::default()).to_vec(), expected);
        assert_eq!(
            rlp::decode::<AccountRecord>(&expected).unwrap(),
            AccountRecord::default()
        );
    }

    #[test]
    fn account_round_trip() {
        let account = AccountRecord {
            nonce: 7,
            balance: BigUint::from(10u64).pow(18),
            storage_root: H256::repeat_byte(1),
            code_hash: H256::repeat_byte(2),
        };
        assert_eq!(
            rlp::decode::<AccountRecord>(&rlp::encode(&account)).unwrap(),
            account
        );
    }

    #[test]
    fn non_canonical_balance_is_rejected() {
        let mut s = RlpStream::new_list(4);
        s.append(&0u8);
        s.append(&vec![0u8, 1]);
        append_hash(&mut s, &EMPTY_ROOT_HASH);
        append_hash(&mut s, &EMPTY_CODE_HASH);
        assert!(rlp::decode::<AccountRecord>(&s.out()).is_err());
    }

    #[test]
    fn storage_values_are_right_aligned() {
        let raw = rlp::encode(&vec![0x01u8, 0x02]);
        assert_eq!(
            decode_storage_value(&raw).unwrap(),
            H256::from_low_u64_be(0x0102)
        );

        let value = H256::from_low_u64_be(100);
        assert_eq!(encode_storage_value(&value), vec![0x64]);
        assert_eq!(
            decode_storage_value(&encode_storage_value(&value)).unwrap(),
            value
        );
    }

    #[test]
    fn oversized_storage_value_is_rejected() {
        let raw = rlp::encode(&vec![0xffu8; 33]);
        assert_eq!(decode_storage_value(&raw), Err(DecoderError::RlpIsTooBig));
    }
}
