// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Nibble paths and their hex-prefix (compact) encoding.

use super::Error;

/// Splits every byte into its high and low nibble.
pub fn from_bytes(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().flat_map(|b| [b >> 4, b & 0x0f]).collect()
}

/// Joins pairs of nibbles back into bytes.
pub fn to_bytes(nibbles: &[u8]) -> Result<Vec<u8>, Error> {
    if nibbles.len() % 2 != 0 {
        return Err(Error::Invalid(format!(
            "key path has an odd number of nibbles ({})",
            nibbles.len()
        )));
    }
    Ok(nibbles
        .chunks_exact(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect())
}

pub fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Hex-prefix encoding. The high nibble of the first byte carries the
/// leaf flag (2) and the odd-length flag (1).
pub fn encode_compact(nibbles: &[u8], leaf: bool) -> Vec<u8> {
    let odd = nibbles.len() % 2 == 1;
    let flag = (u8::from(leaf) << 1) | u8::from(odd);
    let mut out = Vec::with_capacity(nibbles.len() / 2 + 1);
    let rest = if odd {
        out.push((flag << 4) | nibbles[0]);
        &nibbles[1..]
    } else {
        out.push(flag << 4);
        nibbles
    };
    out.extend(rest.chunks_exact(2).map(|pair| (pair[0] << 4) | pair[1]));
    out
}

/// Inverse of [`encode_compact`], returning the path and the leaf flag.
pub fn decode_compact(compact: &[u8]) -> Result<(Vec<u8>, bool), Error> {
    let Some((&first, rest)) = compact.split_first() else {
        return Err(Error::Invalid("empty compact path".into()));
    };
    let flag = first >> 4;
    if flag > 3 {
        return Err(Error::Invalid(format!("invalid compact path flag {flag}")));
    }
    let mut nibbles = Vec::with_capacity(rest.len() * 2 + 1);
    if flag & 1 == 1 {
        nibbles.push(first & 0x0f);
    }
    nibbles.extend(from_bytes(rest));
    Ok((nibbles, flag & 2 == 2))
}
