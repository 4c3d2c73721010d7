// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use ethereum_types::H256;
use num_bigint::BigUint;
use num_traits::Zero as _;
use rlp::{DecoderError, Rlp, RlpStream};

/// Keccak-256 digest of `data`.
pub fn keccak_256(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    keccak_hash::keccak_256(data, &mut out);
    out
}

/// Same as [`keccak_256`], typed as a hash.
pub fn keccak_hash(data: impl AsRef<[u8]>) -> H256 {
    H256(keccak_256(data.as_ref()))
}

/// `Keccak256("")`, the code hash of accounts without code.
pub const EMPTY_CODE_HASH: H256 = H256([
    0xc5, 0xd2, 0x46, 0x01, 0x86, 0xf7, 0x23, 0x3c, 0x92, 0x7e, 0x7d, 0xb2, 0xdc, 0xc7, 0x03, 0xc0,
    0xe5, 0x00, 0xb6, 0x53, 0xca, 0x82, 0x27, 0x3b, 0x7b, 0xfa, 0xd8, 0x04, 0x5d, 0x85, 0xa4, 0x70,
]);

/// Appends a hash as a 32-byte RLP string.
pub fn append_hash(s: &mut RlpStream, hash: &H256) {
    s.append(&hash.as_bytes());
}

/// Decodes a 32-byte RLP string into a hash.
pub fn decode_hash(rlp: &Rlp) -> Result<H256, DecoderError> {
    let data = rlp.data()?;
    if data.len() != 32 {
        return Err(DecoderError::RlpInvalidLength);
    }
    Ok(H256::from_slice(data))
}

/// Decodes an RLP string that must be exactly `len` bytes long.
pub fn decode_fixed_bytes<'a>(rlp: &Rlp<'a>, len: usize) -> Result<&'a [u8], DecoderError> {
    let data = rlp.data()?;
    if data.len() != len {
        return Err(DecoderError::RlpInvalidLength);
    }
    Ok(data)
}

/// Appends an unsigned big integer in its canonical RLP form.
pub fn append_biguint(s: &mut RlpStream, value: &BigUint) {
    if value.is_zero() {
        s.append_empty_data();
    } else {
        s.append(&value.to_bytes_be());
    }
}

/// Decodes an unsigned big integer, rejecting leading zero bytes.
pub fn decode_biguint(rlp: &Rlp) -> Result<BigUint, DecoderError> {
    let data = rlp.data()?;
    if data.first() == Some(&0) {
        return Err(DecoderError::RlpInvalidIndirection);
    }
    Ok(BigUint::from_bytes_be(data))
}

/// Minimal big-endian encoding of an unsigned integer, empty for zero.
pub fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}
