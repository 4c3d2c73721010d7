// Copyright 2019-2025 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Helpers for the quirks of the genesis JSON layout: integers may be hex
//! strings, decimal strings or plain numbers, byte strings may omit the
//! `0x` prefix, and storage words may be shorter than 32 bytes.

use anyhow::{Context as _, bail};
use ethereum_types::{Address, H256};
use num_bigint::BigUint;
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Quantity {
    Number(u64),
    Text(String),
}

fn strip_hex_prefix(s: &str) -> Option<&str> {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
}

pub fn parse_u64(s: &str) -> anyhow::Result<u64> {
    match strip_hex_prefix(s) {
        Some(hex) => u64::from_str_radix(hex, 16)
            .with_context(|| format!("invalid hex number {s}")),
        None => s.parse().with_context(|| format!("invalid number {s}")),
    }
}

pub fn parse_biguint(s: &str) -> anyhow::Result<BigUint> {
    let parsed = match strip_hex_prefix(s) {
        Some(hex) => BigUint::parse_bytes(hex.as_bytes(), 16),
        None => BigUint::parse_bytes(s.as_bytes(), 10),
    };
    parsed.with_context(|| format!("invalid big number {s}"))
}

pub fn parse_bytes(s: &str) -> anyhow::Result<Vec<u8>> {
    let hex = strip_hex_prefix(s).unwrap_or(s);
    hex::decode(hex).with_context(|| format!("invalid hex string {s}"))
}

/// Parses a storage word. Short values are left-padded with zeros.
pub fn parse_word(s: &str) -> anyhow::Result<H256> {
    let hex = strip_hex_prefix(s).unwrap_or(s);
    let bytes = if hex.len() % 2 == 1 {
        hex::decode(format!("0{hex}"))
    } else {
        hex::decode(hex)
    }
    .with_context(|| format!("invalid storage word {s}"))?;
    if bytes.len() > 32 {
        bail!("storage word {s} is longer than 32 bytes");
    }
    let mut word = H256::zero();
    word.as_bytes_mut()[32 - bytes.len()..].copy_from_slice(&bytes);
    Ok(word)
}

pub fn parse_address(s: &str) -> anyhow::Result<Address> {
    let bytes = parse_bytes(s)?;
    if bytes.len() != Address::len_bytes() {
        bail!("invalid address {s}");
    }
    Ok(Address::from_slice(&bytes))
}

pub mod quantity {
    use super::*;

    pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("{value:#x}"))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match Quantity::deserialize(deserializer)? {
            Quantity::Number(n) => Ok(n),
            Quantity::Text(s) => parse_u64(&s).map_err(serde::de::Error::custom),
        }
    }
}

pub mod big_quantity {
    use super::*;

    pub fn serialize<S>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("{value:#x}"))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match Quantity::deserialize(deserializer)? {
            Quantity::Number(n) => Ok(BigUint::from(n)),
            Quantity::Text(s) => parse_biguint(&s).map_err(serde::de::Error::custom),
        }
    }
}

pub mod opt_big_quantity {
    use super::*;

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(value: &Option<BigUint>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match value {
            Some(value) => super::big_quantity::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<BigUint>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match Option::<Quantity>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Quantity::Number(n)) => Ok(Some(BigUint::from(n))),
            Some(Quantity::Text(s)) => parse_biguint(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

pub mod hex_bytes {
    use super::*;

    pub fn serialize<S>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("0x{}", hex::encode(value)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_bytes(&s).map_err(serde::de::Error::custom)
    }
}

/// Storage maps with lenient keys and values.
pub mod storage {
    use super::*;
    use std::collections::BTreeMap;

    pub fn serialize<S>(value: &BTreeMap<H256, H256>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_map(
            value
                .iter()
                .map(|(k, v)| (format!("{k:#x}"), format!("{v:#x}"))),
        )
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<H256, H256>, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        BTreeMap::<String, String>::deserialize(deserializer)?
            .into_iter()
            .map(|(k, v)| -> anyhow::Result<_> {
                Ok((parse_word(&k)?, parse_word(&v)?))
            })
            .collect::<anyhow::Result<_>>()
            .map_err(serde::de::Error::custom)
    }
}

/// Allocation maps keyed by addresses with or without the `0x` prefix.
pub mod alloc {
    use super::*;
    use crate::genesis::{GenesisAccount, GenesisAlloc};
    use std::collections::BTreeMap;

    pub fn serialize<S>(value: &GenesisAlloc, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_map(value.iter().map(|(k, v)| (format!("{k:#x}"), v)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<GenesisAlloc, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        BTreeMap::<String, GenesisAccount>::deserialize(deserializer)?
            .into_iter()
            .map(|(k, v)| -> anyhow::Result<_> {
                Ok((parse_address(&k)?, v))
            })
            .collect::<anyhow::Result<_>>()
            .map_err(serde::de::Error::custom)
    }
}
